//! Base-grade assessment from per-region safety indicators.
//!
//! Each indicator is min-max normalised across the population (inverted for
//! indicators where more is worse), combined with fixed weights, and graded
//! against population quantiles: top 15% A, next 30% B, next 35% C, rest D.

use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;
use tracing::debug;

use super::domain::AdminCode;
use crate::listings::scoring::Grade;

#[derive(Debug, Error)]
pub enum AssessmentError {
    #[error("failed to parse indicator csv: {0}")]
    Csv(#[from] csv::Error),
}

/// One row of `adm_cd,adm_nm,cctv_count,harmful_count,viol_rate,avg_age`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionIndicators {
    pub adm_cd: String,
    #[serde(default)]
    pub adm_nm: String,
    pub cctv_count: f64,
    pub harmful_count: f64,
    pub viol_rate: f64,
    pub avg_age: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssessmentWeights {
    pub cctv: f64,
    pub violation: f64,
    pub harmful: f64,
    pub building_age: f64,
}

impl AssessmentWeights {
    pub const STANDARD: Self = Self {
        cctv: 0.30,
        violation: 0.25,
        harmful: 0.15,
        building_age: 0.10,
    };
}

/// Population quantiles marking the lower edge of A, B, and C.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantileCutoffs {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl QuantileCutoffs {
    pub const STANDARD: Self = Self {
        a: 0.85,
        b: 0.55,
        c: 0.20,
    };
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionAssessment {
    pub admin_code: AdminCode,
    pub name: String,
    pub safety_score: f64,
    pub safety_grade: Grade,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeAssessor {
    weights: AssessmentWeights,
    cutoffs: QuantileCutoffs,
}

impl Default for GradeAssessor {
    fn default() -> Self {
        Self::standard()
    }
}

impl GradeAssessor {
    pub const fn standard() -> Self {
        Self {
            weights: AssessmentWeights::STANDARD,
            cutoffs: QuantileCutoffs::STANDARD,
        }
    }

    pub const fn new(weights: AssessmentWeights, cutoffs: QuantileCutoffs) -> Self {
        Self { weights, cutoffs }
    }

    pub fn assess(&self, rows: &[RegionIndicators]) -> Vec<RegionAssessment> {
        if rows.is_empty() {
            return Vec::new();
        }

        let cctv = normalize(rows.iter().map(|row| row.cctv_count), Direction::Positive);
        let harmful = normalize(rows.iter().map(|row| row.harmful_count), Direction::Negative);
        let violation = normalize(rows.iter().map(|row| row.viol_rate), Direction::Negative);
        let age = normalize(rows.iter().map(|row| row.avg_age), Direction::Negative);

        let scores: Vec<f64> = (0..rows.len())
            .map(|index| {
                cctv[index] * self.weights.cctv
                    + violation[index] * self.weights.violation
                    + harmful[index] * self.weights.harmful
                    + age[index] * self.weights.building_age
            })
            .collect();

        let mut sorted = scores.clone();
        sorted.sort_by(f64::total_cmp);
        let a_cut = quantile(&sorted, self.cutoffs.a);
        let b_cut = quantile(&sorted, self.cutoffs.b);
        let c_cut = quantile(&sorted, self.cutoffs.c);
        debug!(a_cut, b_cut, c_cut, regions = rows.len(), "region quantile cutoffs");

        rows.iter()
            .zip(scores)
            .map(|(row, score)| {
                let safety_grade = if score >= a_cut {
                    Grade::A
                } else if score >= b_cut {
                    Grade::B
                } else if score >= c_cut {
                    Grade::C
                } else {
                    Grade::D
                };
                RegionAssessment {
                    admin_code: AdminCode::new(row.adm_cd.trim()),
                    name: row.adm_nm.clone(),
                    safety_score: round3(score),
                    safety_grade,
                }
            })
            .collect()
    }
}

/// Load indicator rows with headers, trimming whitespace around fields.
pub fn read_indicators<R: io::Read>(reader: R) -> Result<Vec<RegionIndicators>, AssessmentError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Positive,
    Negative,
}

fn normalize(values: impl Iterator<Item = f64>, direction: Direction) -> Vec<f64> {
    let values: Vec<f64> = values.collect();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max == min {
        let constant = match direction {
            Direction::Positive => 1.0,
            Direction::Negative => 0.0,
        };
        return vec![constant; values.len()];
    }

    values
        .iter()
        .map(|value| {
            let scaled = (value - min) / (max - min);
            match direction {
                Direction::Positive => scaled,
                Direction::Negative => 1.0 - scaled,
            }
        })
        .collect()
}

/// Linear-interpolated quantile of an ascending, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let last = sorted.len().saturating_sub(1);
    let position = q.clamp(0.0, 1.0) * last as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    match (sorted.get(lower), sorted.get(upper)) {
        (Some(low), Some(high)) => low + (high - low) * (position - lower as f64),
        _ => 0.0,
    }
}

fn round3(value: f64) -> f64 {
    (value * 1_000.0).round() / 1_000.0
}
