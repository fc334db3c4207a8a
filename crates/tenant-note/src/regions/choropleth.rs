use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

use super::domain::{AdminCode, Region};
use super::simulator::{RegionGradeSimulator, ViewMode};
use crate::listings::domain::Coordinates;
use crate::listings::scoring::Grade;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoroplethCell {
    pub admin_code: AdminCode,
    pub name: String,
    pub grade: Grade,
    pub fill_color: &'static str,
    pub ring: Vec<Coordinates>,
}

/// Region polygons coloured by grade for one view mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoroplethLayer {
    pub view_mode: ViewMode,
    pub cells: Vec<ChoroplethCell>,
}

impl ChoroplethLayer {
    /// Grade every region and keep those whose grade is in `visible`.
    pub fn build<'a, I>(
        regions: I,
        simulator: &RegionGradeSimulator,
        view_mode: ViewMode,
        visible: &BTreeSet<Grade>,
    ) -> Self
    where
        I: IntoIterator<Item = &'a Region>,
    {
        let mut hidden = 0usize;
        let cells: Vec<ChoroplethCell> = regions
            .into_iter()
            .filter_map(|region| {
                let grade = simulator.grade_for(region, view_mode);
                if !visible.contains(&grade) {
                    hidden += 1;
                    return None;
                }
                Some(ChoroplethCell {
                    admin_code: region.admin_code().clone(),
                    name: region.name().to_string(),
                    grade,
                    fill_color: grade.fill_color(),
                    ring: region.closed_ring(),
                })
            })
            .collect();

        debug!(
            view_mode = view_mode.token(),
            shown = cells.len(),
            hidden,
            "built choropleth layer"
        );
        Self { view_mode, cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
