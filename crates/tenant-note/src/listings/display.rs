use serde::{Deserialize, Serialize};

use super::domain::Price;

const SQUARE_METRES_PER_PYEONG: f64 = 3.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaUnit {
    #[default]
    Pyeong,
    SquareMetre,
}

impl AreaUnit {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Pyeong => Self::SquareMetre,
            Self::SquareMetre => Self::Pyeong,
        }
    }

    pub fn format(self, size: u32) -> String {
        match self {
            Self::Pyeong => format!("{size}평"),
            Self::SquareMetre => format!("{:.1}㎡", f64::from(size) * SQUARE_METRES_PER_PYEONG),
        }
    }
}

/// Korean price label. Deposits of 10,000 (1억) or more are written in 억
/// with the remainder rounded to the nearest 천, carrying into the next 억
/// at 9,500; jeonse listings have no monthly part.
pub fn format_price(price: Price) -> String {
    let Price { deposit, monthly } = price;

    let deposit_label = if deposit >= 10_000 {
        let mut eok = deposit / 10_000;
        let mut cheon = (deposit % 10_000 + 500) / 1_000;
        if cheon == 10 {
            eok += 1;
            cheon = 0;
        }
        if cheon > 0 {
            format!("{eok}억 {cheon}천")
        } else {
            format!("{eok}억")
        }
    } else if deposit > 0 {
        group_thousands(deposit)
    } else {
        String::new()
    };

    if monthly > 0 {
        if deposit > 0 {
            format!("{deposit_label} / {monthly}")
        } else {
            format!("무보증 {monthly}")
        }
    } else if deposit_label.is_empty() {
        "전세".to_string()
    } else {
        deposit_label
    }
}

fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
