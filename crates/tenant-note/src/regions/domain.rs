use serde::{Deserialize, Serialize};
use std::fmt;

use crate::listings::domain::Coordinates;
use crate::listings::scoring::Grade;

/// Administrative dong code, e.g. `11210640`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdminCode(String);

impl AdminCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AdminCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AdminCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Region geometry with its stored overall grade.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    admin_code: AdminCode,
    name: String,
    base_grade: Grade,
    polygon: Vec<Coordinates>,
}

impl Region {
    pub fn new(
        admin_code: AdminCode,
        name: impl Into<String>,
        base_grade: Grade,
        polygon: Vec<Coordinates>,
    ) -> Self {
        Self {
            admin_code,
            name: name.into(),
            base_grade,
            polygon,
        }
    }

    pub fn admin_code(&self) -> &AdminCode {
        &self.admin_code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_grade(&self) -> Grade {
        self.base_grade
    }

    pub fn polygon(&self) -> &[Coordinates] {
        &self.polygon
    }

    /// Outer ring with the first vertex repeated at the end when the source
    /// left it open.
    pub fn closed_ring(&self) -> Vec<Coordinates> {
        let mut ring = self.polygon.clone();
        if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
            if ring.len() > 1 && first != last {
                ring.push(first);
            }
        }
        ring
    }
}
