use serde::{Deserialize, Serialize};
use std::fmt;

/// Letter classification shared by listings and choropleth regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
}

impl Grade {
    pub const fn ordered() -> [Self; 4] {
        [Self::A, Self::B, Self::C, Self::D]
    }

    pub const fn letter(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }

    /// One of the four fixed choropleth fills.
    pub const fn fill_color(self) -> &'static str {
        match self {
            Self::A => "#22c55e",
            Self::B => "#eab308",
            Self::C => "#f97316",
            Self::D => "#ef4444",
        }
    }

    pub fn from_letter(raw: &str) -> Option<Self> {
        match raw.trim() {
            "A" | "a" => Some(Self::A),
            "B" | "b" => Some(Self::B),
            "C" | "c" => Some(Self::C),
            "D" | "d" => Some(Self::D),
            _ => None,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

/// Inclusive lower bounds for each grade, checked from A downwards.
///
/// B spans the wide middle band from 55 up to 85.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeThresholds {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl GradeThresholds {
    pub const STANDARD: Self = Self {
        a: 85.0,
        b: 55.0,
        c: 20.0,
    };

    pub fn grade_for(&self, final_score: f64) -> Grade {
        if final_score >= self.a {
            Grade::A
        } else if final_score >= self.b {
            Grade::B
        } else if final_score >= self.c {
            Grade::C
        } else {
            Grade::D
        }
    }
}

impl Default for GradeThresholds {
    fn default() -> Self {
        Self::STANDARD
    }
}
