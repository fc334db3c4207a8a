use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::features::FeatureTag;
use super::scoring::{Grade, ScoreCard, ScoringEngine, SubScores};
use super::swot::{self, Swot, SwotContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HousingType {
    Apt,
    Op,
    Yh,
    Dd,
}

impl HousingType {
    pub const fn ordered() -> [Self; 4] {
        [Self::Apt, Self::Op, Self::Yh, Self::Dd]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Apt => "APT",
            Self::Op => "OP",
            Self::Yh => "YH",
            Self::Dd => "DD",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Apt => "Apartment",
            Self::Op => "Officetel",
            Self::Yh => "Row House / Multiplex",
            Self::Dd => "Detached / Multi-family",
        }
    }

    /// Marker fill used on the map for listings of this type.
    pub const fn marker_color(self) -> &'static str {
        match self {
            Self::Apt => "#3B82F6",
            Self::Op => "#8B5CF6",
            Self::Yh => "#F97316",
            Self::Dd => "#22C55E",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|kind| kind.code().eq_ignore_ascii_case(code.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealType {
    Monthly,
    Jeonse,
}

impl DealType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Monthly => "Monthly Rent",
            Self::Jeonse => "Jeonse",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatingMethod {
    District,
    Individual,
    Central,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatingFuel {
    CombinedHeatPower,
    CityGas,
    OilLpg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heating {
    pub method: HeatingMethod,
    pub fuel: HeatingFuel,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Asking price in units of 10,000 KRW.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub deposit: u32,
    pub monthly: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(pub u32);

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw listing attributes before scoring, SWOT, and feature derivation.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDraft {
    pub id: ListingId,
    pub name: String,
    pub housing_type: HousingType,
    pub deal_type: DealType,
    pub coordinates: Coordinates,
    pub price: Price,
    pub size: u32,
    pub slope: u8,
    pub noise_level: u8,
    pub heating: Heating,
    pub scores: SubScores,
    pub listed_on: NaiveDate,
}

impl ListingDraft {
    /// Assemble the immutable listing. Sub-scores are clamped into `0..=100`
    /// before the composite score is derived, so the grade always matches.
    pub fn finalize(self, engine: &ScoringEngine) -> Listing {
        let scores = self.scores.clamped();
        if scores != self.scores {
            tracing::warn!(listing_id = %self.id, "sub-scores clamped into 0..=100");
        }

        let card = engine.score(&scores);
        let features = FeatureTag::derive(self.slope, self.noise_level, &scores);
        let swot = swot::analyze(SwotContext {
            housing_type: self.housing_type,
            slope: self.slope,
            deposit: self.price.deposit,
            grade: card.grade,
            scores: &scores,
        });

        Listing {
            id: self.id,
            name: self.name,
            housing_type: self.housing_type,
            deal_type: self.deal_type,
            coordinates: self.coordinates,
            price: self.price,
            size: self.size,
            slope: self.slope,
            noise_level: self.noise_level,
            heating: self.heating,
            scores,
            final_score: card.final_score,
            grade: card.grade,
            features,
            swot,
            listed_on: self.listed_on,
        }
    }
}

/// Fully scored listing. Derived fields are only reachable through accessors
/// so the score, grade, and tags can never drift apart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    id: ListingId,
    name: String,
    housing_type: HousingType,
    deal_type: DealType,
    coordinates: Coordinates,
    price: Price,
    size: u32,
    slope: u8,
    noise_level: u8,
    heating: Heating,
    scores: SubScores,
    final_score: f64,
    grade: Grade,
    features: Vec<FeatureTag>,
    swot: Swot,
    listed_on: NaiveDate,
}

impl Listing {
    pub fn id(&self) -> ListingId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn housing_type(&self) -> HousingType {
        self.housing_type
    }

    pub fn deal_type(&self) -> DealType {
        self.deal_type
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn slope(&self) -> u8 {
        self.slope
    }

    pub fn noise_level(&self) -> u8 {
        self.noise_level
    }

    pub fn heating(&self) -> Heating {
        self.heating
    }

    pub fn scores(&self) -> &SubScores {
        &self.scores
    }

    pub fn final_score(&self) -> f64 {
        self.final_score
    }

    pub fn grade(&self) -> Grade {
        self.grade
    }

    pub fn features(&self) -> &[FeatureTag] {
        &self.features
    }

    pub fn swot(&self) -> &Swot {
        &self.swot
    }

    pub fn listed_on(&self) -> NaiveDate {
        self.listed_on
    }

    /// Re-run the engine to recover the per-factor trail behind the grade.
    pub fn score_card(&self, engine: &ScoringEngine) -> ScoreCard {
        engine.score(&self.scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::swot::SwotTag;

    fn draft(scores: SubScores) -> ListingDraft {
        ListingDraft {
            id: ListingId(7),
            name: "Gwanak Park".to_string(),
            housing_type: HousingType::Apt,
            deal_type: DealType::Monthly,
            coordinates: Coordinates::new(37.4842, 126.9296),
            price: Price {
                deposit: 12_000,
                monthly: 55,
            },
            size: 18,
            slope: 3,
            noise_level: 52,
            heating: Heating {
                method: HeatingMethod::District,
                fuel: HeatingFuel::CombinedHeatPower,
            },
            scores,
            listed_on: NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date"),
        }
    }

    #[test]
    fn finalize_derives_consistent_score_grade_and_swot() {
        let listing = draft(SubScores::uniform(90)).finalize(&ScoringEngine::standard());

        assert!((listing.final_score() - 90.0).abs() < 1e-9);
        assert_eq!(listing.grade(), Grade::A);
        assert!(listing.swot().strengths.contains(&SwotTag::Curated));
        assert!(listing.features().contains(&FeatureTag::FlatTerrain));
    }

    #[test]
    fn finalize_clamps_out_of_range_scores() {
        let mut scores = SubScores::uniform(50);
        scores.traffic = 140;
        let listing = draft(scores).finalize(&ScoringEngine::standard());

        assert_eq!(listing.scores().traffic, 100);
        let expected = ScoringEngine::standard().final_score(listing.scores());
        assert!((listing.final_score() - expected).abs() < 1e-9);
    }

    #[test]
    fn housing_type_codes_round_trip() {
        for kind in HousingType::ordered() {
            assert_eq!(HousingType::from_code(kind.code()), Some(kind));
        }
        assert_eq!(HousingType::from_code(" op "), Some(HousingType::Op));
        assert_eq!(HousingType::from_code("villa"), None);
    }

    #[test]
    fn housing_type_serializes_as_upper_case_code() {
        let json = serde_json::to_string(&HousingType::Yh).expect("serialize");
        assert_eq!(json, "\"YH\"");
    }

    #[test]
    fn listing_serializes_with_camel_case_keys() {
        let listing = draft(SubScores::uniform(90)).finalize(&ScoringEngine::standard());
        let value = serde_json::to_value(&listing).expect("serialize");

        assert_eq!(value["dealType"], "monthly");
        assert_eq!(value["housingType"], "APT");
        assert_eq!(value["noiseLevel"], 52);
        assert_eq!(value["listedOn"], "2025-03-01");
        assert_eq!(value["scores"]["propertyBuilding"], 90);
        assert!(value["finalScore"].is_number());
        assert!(value.get("deal_type").is_none());
    }
}
