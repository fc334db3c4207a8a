use serde::{Deserialize, Serialize};
use std::num::IntErrorKind;
use tracing::debug;

/// Raw budget fields as typed into the search panel. Blank means "open".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BudgetInput {
    pub deposit_min: String,
    pub deposit_max: String,
    pub rent_min: String,
    pub rent_max: String,
}

impl BudgetInput {
    /// Parse into numeric bounds. Malformed fields fall back to the open
    /// bound so a typo never blocks filtering.
    pub fn bounds(&self) -> BudgetBounds {
        BudgetBounds {
            deposit: AmountRange {
                min: parse_amount("depositMin", &self.deposit_min).unwrap_or(0),
                max: parse_amount("depositMax", &self.deposit_max),
            },
            rent: AmountRange {
                min: parse_amount("rentMin", &self.rent_min).unwrap_or(0),
                max: parse_amount("rentMax", &self.rent_max),
            },
        }
    }
}

/// Inclusive range; `max == None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AmountRange {
    pub min: u32,
    pub max: Option<u32>,
}

impl AmountRange {
    pub const OPEN: Self = Self { min: 0, max: None };

    pub fn contains(&self, value: u32) -> bool {
        value >= self.min && self.max.map_or(true, |max| value <= max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BudgetBounds {
    pub deposit: AmountRange,
    pub rent: AmountRange,
}

impl BudgetBounds {
    pub const OPEN: Self = Self {
        deposit: AmountRange::OPEN,
        rent: AmountRange::OPEN,
    };
}

fn parse_amount(field: &'static str, raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let cleaned: String = trimmed.chars().filter(|ch| *ch != ',').collect();
    match cleaned.parse::<u32>() {
        Ok(value) => Some(value),
        Err(err) if *err.kind() == IntErrorKind::PosOverflow => Some(u32::MAX),
        Err(err) => {
            debug!(field, value = raw, %err, "ignoring malformed budget bound");
            None
        }
    }
}
