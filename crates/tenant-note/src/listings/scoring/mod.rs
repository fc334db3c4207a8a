mod grade;
mod weights;

pub use grade::{Grade, GradeThresholds};
pub use weights::{ScoreFactor, ScoreWeights, SubScores, MAX_SUB_SCORE};

use serde::Serialize;

/// Stateless scorer turning the six sub-scores into a composite and a grade.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoringEngine {
    weights: ScoreWeights,
    thresholds: GradeThresholds,
}

impl ScoringEngine {
    pub const fn standard() -> Self {
        Self {
            weights: ScoreWeights::STANDARD,
            thresholds: GradeThresholds::STANDARD,
        }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    pub fn thresholds(&self) -> &GradeThresholds {
        &self.thresholds
    }

    /// Weighted sum of the sub-scores, unrounded.
    pub fn final_score(&self, scores: &SubScores) -> f64 {
        ScoreFactor::ordered()
            .into_iter()
            .map(|factor| self.weights.get(factor) * f64::from(scores.get(factor)))
            .sum()
    }

    pub fn grade_for(&self, final_score: f64) -> Grade {
        self.thresholds.grade_for(final_score)
    }

    pub fn score(&self, scores: &SubScores) -> ScoreCard {
        let components: Vec<ScoreComponent> = ScoreFactor::ordered()
            .into_iter()
            .map(|factor| {
                let score = scores.get(factor);
                let weight = self.weights.get(factor);
                ScoreComponent {
                    factor,
                    label: factor.label(),
                    score,
                    weight,
                    contribution: weight * f64::from(score),
                }
            })
            .collect();

        let final_score: f64 = components.iter().map(|c| c.contribution).sum();

        ScoreCard {
            final_score,
            grade: self.grade_for(final_score),
            components,
        }
    }
}

/// One factor's share of the composite, kept for radar charts and audits.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub label: &'static str,
    pub score: u8,
    pub weight: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCard {
    pub final_score: f64,
    pub grade: Grade,
    pub components: Vec<ScoreComponent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_one() {
        assert!((ScoreWeights::STANDARD.total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn final_score_is_weighted_sum() {
        let scores = SubScores {
            traffic: 80,
            property_building: 60,
            security_safety: 70,
            living_comfort: 50,
            living_infra: 40,
            environment: 100,
        };
        let expected = 80.0 * 0.25
            + 60.0 * 0.25
            + 40.0 * 0.15
            + 70.0 * 0.15
            + 50.0 * 0.15
            + 100.0 * 0.05;

        let engine = ScoringEngine::standard();
        assert!((engine.final_score(&scores) - expected).abs() < 1e-9);
        assert!((engine.score(&scores).final_score - expected).abs() < 1e-9);
    }

    #[test]
    fn grade_boundaries_are_exact() {
        let engine = ScoringEngine::standard();
        assert_eq!(engine.grade_for(85.0), Grade::A);
        assert_eq!(engine.grade_for(84.999), Grade::B);
        assert_eq!(engine.grade_for(55.0), Grade::B);
        assert_eq!(engine.grade_for(54.999), Grade::C);
        assert_eq!(engine.grade_for(20.0), Grade::C);
        assert_eq!(engine.grade_for(19.999), Grade::D);
        assert_eq!(engine.grade_for(0.0), Grade::D);
        assert_eq!(engine.grade_for(100.0), Grade::A);
    }

    #[test]
    fn uniform_ninety_scores_grade_a() {
        let card = ScoringEngine::standard().score(&SubScores::uniform(90));
        assert!((card.final_score - 90.0).abs() < 1e-9);
        assert_eq!(card.grade, Grade::A);
        assert_eq!(card.components.len(), 6);
    }

    #[test]
    fn components_report_each_contribution() {
        let mut scores = SubScores::uniform(0);
        scores.environment = 100;
        let card = ScoringEngine::standard().score(&scores);

        let environment = card
            .components
            .iter()
            .find(|component| component.factor == ScoreFactor::Environment)
            .expect("environment component present");
        assert!((environment.contribution - 5.0).abs() < 1e-9);
        assert_eq!(card.grade, Grade::D);
    }

    #[test]
    fn grade_letters_parse_loosely() {
        assert_eq!(Grade::from_letter(" b "), Some(Grade::B));
        assert_eq!(Grade::from_letter("A+"), None);
        assert_eq!(Grade::D.fill_color(), "#ef4444");
    }
}
