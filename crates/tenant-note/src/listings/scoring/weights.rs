use serde::{Deserialize, Serialize};

pub const MAX_SUB_SCORE: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    Traffic,
    PropertyBuilding,
    SecuritySafety,
    LivingComfort,
    LivingInfra,
    Environment,
}

impl ScoreFactor {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Traffic,
            Self::PropertyBuilding,
            Self::SecuritySafety,
            Self::LivingComfort,
            Self::LivingInfra,
            Self::Environment,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Traffic => "Transit",
            Self::PropertyBuilding => "Property / Building",
            Self::SecuritySafety => "Security / Safety",
            Self::LivingComfort => "Living Comfort",
            Self::LivingInfra => "Living Infrastructure",
            Self::Environment => "Environment",
        }
    }
}

/// The six habitability sub-scores, each expected in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubScores {
    pub traffic: u8,
    pub property_building: u8,
    pub security_safety: u8,
    pub living_comfort: u8,
    pub living_infra: u8,
    pub environment: u8,
}

impl SubScores {
    pub const fn uniform(value: u8) -> Self {
        Self {
            traffic: value,
            property_building: value,
            security_safety: value,
            living_comfort: value,
            living_infra: value,
            environment: value,
        }
    }

    pub const fn get(&self, factor: ScoreFactor) -> u8 {
        match factor {
            ScoreFactor::Traffic => self.traffic,
            ScoreFactor::PropertyBuilding => self.property_building,
            ScoreFactor::SecuritySafety => self.security_safety,
            ScoreFactor::LivingComfort => self.living_comfort,
            ScoreFactor::LivingInfra => self.living_infra,
            ScoreFactor::Environment => self.environment,
        }
    }

    pub fn clamped(self) -> Self {
        Self {
            traffic: self.traffic.min(MAX_SUB_SCORE),
            property_building: self.property_building.min(MAX_SUB_SCORE),
            security_safety: self.security_safety.min(MAX_SUB_SCORE),
            living_comfort: self.living_comfort.min(MAX_SUB_SCORE),
            living_infra: self.living_infra.min(MAX_SUB_SCORE),
            environment: self.environment.min(MAX_SUB_SCORE),
        }
    }
}

/// Fixed factor weights. They sum to 1.0 so the composite stays in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreWeights {
    pub traffic: f64,
    pub property_building: f64,
    pub security_safety: f64,
    pub living_comfort: f64,
    pub living_infra: f64,
    pub environment: f64,
}

impl ScoreWeights {
    pub const STANDARD: Self = Self {
        traffic: 0.25,
        property_building: 0.25,
        living_infra: 0.15,
        security_safety: 0.15,
        living_comfort: 0.15,
        environment: 0.05,
    };

    pub const fn get(&self, factor: ScoreFactor) -> f64 {
        match factor {
            ScoreFactor::Traffic => self.traffic,
            ScoreFactor::PropertyBuilding => self.property_building,
            ScoreFactor::SecuritySafety => self.security_safety,
            ScoreFactor::LivingComfort => self.living_comfort,
            ScoreFactor::LivingInfra => self.living_infra,
            ScoreFactor::Environment => self.environment,
        }
    }

    pub fn total(&self) -> f64 {
        ScoreFactor::ordered()
            .into_iter()
            .map(|factor| self.get(factor))
            .sum()
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self::STANDARD
    }
}
