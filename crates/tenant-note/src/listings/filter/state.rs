use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::budget::BudgetInput;
use crate::listings::domain::{DealType, HousingType};
use crate::listings::scoring::Grade;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SizeBucket {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "under10")]
    Under10,
    #[serde(rename = "10to20")]
    From10To20,
    #[serde(rename = "over30")]
    Over30,
}

impl SizeBucket {
    pub fn contains(self, size: u32) -> bool {
        match self {
            Self::All => true,
            Self::Under10 => size < 10,
            Self::From10To20 => (10..20).contains(&size),
            Self::Over30 => size >= 30,
        }
    }
}

/// Search panel configuration.
///
/// `grades` does not narrow the listing list; it selects which choropleth
/// regions are drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub housing_types: BTreeSet<HousingType>,
    pub deal_type: DealType,
    pub size_bucket: SizeBucket,
    pub budget: BudgetInput,
    pub grades: BTreeSet<Grade>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            housing_types: HousingType::ordered().into_iter().collect(),
            deal_type: DealType::Monthly,
            size_bucket: SizeBucket::All,
            budget: BudgetInput::default(),
            grades: Grade::ordered().into_iter().collect(),
        }
    }
}

/// Mutations the control layer may issue against a [`FilterState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum FilterCommand {
    ToggleHousingType { housing_type: HousingType },
    SetDealType { deal_type: DealType },
    SetSizeBucket { size_bucket: SizeBucket },
    SetBudget { budget: BudgetInput },
    ToggleGrade { grade: Grade },
    Reset,
}

impl FilterState {
    pub fn toggle_housing_type(&mut self, housing_type: HousingType) {
        if !self.housing_types.remove(&housing_type) {
            self.housing_types.insert(housing_type);
        }
    }

    pub fn toggle_grade(&mut self, grade: Grade) {
        if !self.grades.remove(&grade) {
            self.grades.insert(grade);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn apply(&mut self, command: FilterCommand) {
        match command {
            FilterCommand::ToggleHousingType { housing_type } => {
                self.toggle_housing_type(housing_type)
            }
            FilterCommand::SetDealType { deal_type } => self.deal_type = deal_type,
            FilterCommand::SetSizeBucket { size_bucket } => self.size_bucket = size_bucket,
            FilterCommand::SetBudget { budget } => self.budget = budget,
            FilterCommand::ToggleGrade { grade } => self.toggle_grade(grade),
            FilterCommand::Reset => self.reset(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_buckets_follow_documented_edges() {
        assert!(SizeBucket::Under10.contains(9));
        assert!(!SizeBucket::Under10.contains(10));
        assert!(SizeBucket::From10To20.contains(10));
        assert!(SizeBucket::From10To20.contains(19));
        assert!(!SizeBucket::From10To20.contains(20));
        assert!(!SizeBucket::Over30.contains(29));
        assert!(SizeBucket::Over30.contains(30));
        assert!(SizeBucket::All.contains(25));
    }

    #[test]
    fn toggles_flip_membership() {
        let mut state = FilterState::default();
        state.toggle_housing_type(HousingType::Op);
        assert!(!state.housing_types.contains(&HousingType::Op));
        state.toggle_housing_type(HousingType::Op);
        assert!(state.housing_types.contains(&HousingType::Op));

        state.toggle_grade(Grade::D);
        assert_eq!(state.grades.len(), 3);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut state = FilterState::default();
        state.apply(FilterCommand::SetDealType {
            deal_type: DealType::Jeonse,
        });
        state.apply(FilterCommand::SetSizeBucket {
            size_bucket: SizeBucket::Over30,
        });
        state.apply(FilterCommand::ToggleGrade { grade: Grade::A });
        assert_ne!(state, FilterState::default());

        state.apply(FilterCommand::Reset);
        assert_eq!(state, FilterState::default());
    }

    #[test]
    fn commands_deserialize_from_tagged_json() {
        let command: FilterCommand = serde_json::from_str(
            r#"{"command":"set_size_bucket","size_bucket":"10to20"}"#,
        )
        .expect("command parses");
        assert_eq!(
            command,
            FilterCommand::SetSizeBucket {
                size_bucket: SizeBucket::From10To20
            }
        );

        let command: FilterCommand = serde_json::from_str(
            r#"{"command":"set_budget","budget":{"depositMax":"30000"}}"#,
        )
        .expect("budget command parses");
        match command {
            FilterCommand::SetBudget { budget } => {
                assert_eq!(budget.deposit_max, "30000");
                assert!(budget.rent_min.is_empty());
            }
            other => panic!("expected budget command, got {other:?}"),
        }
    }

    #[test]
    fn state_serializes_with_camel_case_keys() {
        let value = serde_json::to_value(FilterState::default()).expect("serialize");
        assert_eq!(value["dealType"], "monthly");
        assert_eq!(value["sizeBucket"], "all");
        assert_eq!(value["housingTypes"].as_array().map(Vec::len), Some(4));
    }
}
