//! Per-view-mode region grades.
//!
//! The `total` view shows a region's stored grade. Every other view derives
//! a deterministic grade from a stable hash of the admin code and the view
//! token, so the same pair always paints the same colour.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use super::domain::{AdminCode, Region};
use crate::listings::scoring::Grade;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Total,
    Security,
    Building,
    Comfort,
    Infra,
    Traffic,
    Environment,
}

impl ViewMode {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Total,
            Self::Security,
            Self::Building,
            Self::Comfort,
            Self::Infra,
            Self::Traffic,
            Self::Environment,
        ]
    }

    pub const fn token(self) -> &'static str {
        match self {
            Self::Total => "total",
            Self::Security => "security",
            Self::Building => "building",
            Self::Comfort => "comfort",
            Self::Infra => "infra",
            Self::Traffic => "traffic",
            Self::Environment => "environment",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Total => "Overall",
            Self::Security => "Security & Safety",
            Self::Building => "Property & Building",
            Self::Comfort => "Living Comfort",
            Self::Infra => "Living Infrastructure",
            Self::Traffic => "Traffic",
            Self::Environment => "Environment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown view mode `{0}` (expected total, security, building, comfort, infra, traffic or environment)")]
pub struct ViewModeParseError(String);

impl FromStr for ViewMode {
    type Err = ViewModeParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let token = value.trim();
        Self::ordered()
            .into_iter()
            .find(|mode| mode.token().eq_ignore_ascii_case(token))
            .ok_or_else(|| ViewModeParseError(value.to_string()))
    }
}

/// String hash used to spread regions across grades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeHashScheme {
    /// 64-bit FNV-1a over the code bytes, a 0xFF separator, and the view token.
    #[default]
    Fnv1a,
    /// Sum of UTF-16 code units of the code plus the view token length.
    CharSum,
}

impl GradeHashScheme {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "fnv1a" | "fnv" => Some(Self::Fnv1a),
            "char_sum" | "charsum" | "legacy" => Some(Self::CharSum),
            _ => None,
        }
    }

    pub const fn token(self) -> &'static str {
        match self {
            Self::Fnv1a => "fnv1a",
            Self::CharSum => "char_sum",
        }
    }

    pub fn hash(self, admin_code: &str, mode: ViewMode) -> u64 {
        match self {
            Self::Fnv1a => {
                let mut hasher = Fnv1a::new();
                hasher.write(admin_code.as_bytes());
                hasher.write(&[0xFF]);
                hasher.write(mode.token().as_bytes());
                hasher.finish()
            }
            Self::CharSum => {
                let sum: u64 = admin_code.encode_utf16().map(u64::from).sum();
                sum + mode.token().len() as u64
            }
        }
    }
}

struct Fnv1a {
    state: u64,
}

impl Fnv1a {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= u64::from(byte);
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }

    fn finish(&self) -> u64 {
        self.state
    }
}

/// Map `hash mod 100` onto the grade bands (>70 A, >40 B, >20 C, else D).
fn grade_from_hash(hash: u64) -> Grade {
    match hash % 100 {
        71..=99 => Grade::A,
        41..=70 => Grade::B,
        21..=40 => Grade::C,
        _ => Grade::D,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegionGradeSimulator {
    scheme: GradeHashScheme,
}

impl RegionGradeSimulator {
    pub const fn new(scheme: GradeHashScheme) -> Self {
        Self { scheme }
    }

    pub fn scheme(&self) -> GradeHashScheme {
        self.scheme
    }

    pub fn simulate(&self, admin_code: &AdminCode, base_grade: Grade, mode: ViewMode) -> Grade {
        match mode {
            ViewMode::Total => base_grade,
            _ => grade_from_hash(self.scheme.hash(admin_code.as_str(), mode)),
        }
    }

    pub fn grade_for(&self, region: &Region, mode: ViewMode) -> Grade {
        self.simulate(region.admin_code(), region.base_grade(), mode)
    }
}
