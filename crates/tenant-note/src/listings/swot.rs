use serde::Serialize;

use super::domain::HousingType;
use super::scoring::{Grade, SubScores};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SwotTag {
    Transit,
    QuietEnvironment,
    Value,
    Curated,
    Unremarkable,
    TransitPoor,
    Hill,
    OldBuilding,
    NoMajorFlaw,
    RedevelopmentCandidate,
    TransitExpansion,
    CommercialRedevelopment,
    RentPressure,
    ConstructionNoise,
}

impl SwotTag {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transit => "transit",
            Self::QuietEnvironment => "quiet-environment",
            Self::Value => "value",
            Self::Curated => "curated",
            Self::Unremarkable => "unremarkable",
            Self::TransitPoor => "transit-poor",
            Self::Hill => "hill",
            Self::OldBuilding => "old-building",
            Self::NoMajorFlaw => "no-major-flaw",
            Self::RedevelopmentCandidate => "redevelopment-candidate",
            Self::TransitExpansion => "transit-expansion",
            Self::CommercialRedevelopment => "commercial-redevelopment",
            Self::RentPressure => "rent-pressure",
            Self::ConstructionNoise => "construction-noise",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Transit => "Five-minute walk to a subway station",
            Self::QuietEnvironment => "Green, quiet surroundings near parks and trails",
            Self::Value => "Rare value for money in Seoul",
            Self::Curated => "Top pick recommended by local agents",
            Self::Unremarkable => "Solid, unremarkable location",
            Self::TransitPoor => "Village bus needed to reach the subway",
            Self::Hill => "Steep uphill walk every day",
            Self::OldBuilding => "Ageing building with tight parking",
            Self::NoMajorFlaw => "No major drawbacks",
            Self::RedevelopmentCandidate => "Possible candidate for block redevelopment",
            Self::TransitExpansion => "Planned light-rail line nearby",
            Self::CommercialRedevelopment => "Surrounding commercial district being remodelled",
            Self::RentPressure => "Demand from outside may push deposits up",
            Self::ConstructionNoise => "Nearby construction may bring dust and noise",
        }
    }
}

/// Strength/weakness/opportunity/threat tags. Every list is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Swot {
    #[serde(rename = "s")]
    pub strengths: Vec<SwotTag>,
    #[serde(rename = "w")]
    pub weaknesses: Vec<SwotTag>,
    #[serde(rename = "o")]
    pub opportunities: Vec<SwotTag>,
    #[serde(rename = "t")]
    pub threats: Vec<SwotTag>,
}

/// The listing attributes the narrative rules look at.
#[derive(Debug, Clone, Copy)]
pub struct SwotContext<'a> {
    pub housing_type: HousingType,
    pub slope: u8,
    pub deposit: u32,
    pub grade: Grade,
    pub scores: &'a SubScores,
}

const VALUE_DEPOSIT_CEILING: u32 = 20_000;

/// Evaluate every rule; matches accumulate rather than short-circuit.
pub fn analyze(ctx: SwotContext<'_>) -> Swot {
    let scores = ctx.scores;

    let mut strengths = Vec::new();
    if scores.traffic > 80 {
        strengths.push(SwotTag::Transit);
    }
    if scores.living_comfort > 80 {
        strengths.push(SwotTag::QuietEnvironment);
    }
    if ctx.housing_type == HousingType::Yh && ctx.deposit < VALUE_DEPOSIT_CEILING {
        strengths.push(SwotTag::Value);
    }
    if ctx.grade == Grade::A {
        strengths.push(SwotTag::Curated);
    }

    let mut weaknesses = Vec::new();
    if scores.traffic < 40 {
        weaknesses.push(SwotTag::TransitPoor);
    }
    if ctx.slope > 10 {
        weaknesses.push(SwotTag::Hill);
    }
    if scores.property_building < 50 {
        weaknesses.push(SwotTag::OldBuilding);
    }

    let opportunities = match ctx.housing_type {
        HousingType::Yh | HousingType::Dd => vec![
            SwotTag::RedevelopmentCandidate,
            SwotTag::TransitExpansion,
        ],
        HousingType::Apt | HousingType::Op => vec![SwotTag::CommercialRedevelopment],
    };

    let threats = if scores.traffic > 90 {
        vec![SwotTag::RentPressure]
    } else {
        vec![SwotTag::ConstructionNoise]
    };

    if strengths.is_empty() {
        strengths.push(SwotTag::Unremarkable);
    }
    if weaknesses.is_empty() {
        weaknesses.push(SwotTag::NoMajorFlaw);
    }

    Swot {
        strengths,
        weaknesses,
        opportunities,
        threats,
    }
}
