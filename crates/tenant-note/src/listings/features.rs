use serde::Serialize;

use super::scoring::SubScores;

/// Informational badges shown on listing cards. They never affect scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureTag {
    FlatTerrain,
    SteepClimb,
    NoiseCaution,
    NearStation,
    TransitHub,
}

impl FeatureTag {
    pub const fn label(self) -> &'static str {
        match self {
            Self::FlatTerrain => "Completely flat",
            Self::SteepClimb => "Hiking course",
            Self::NoiseCaution => "Noise caution",
            Self::NearStation => "Near station",
            Self::TransitHub => "Right by the station",
        }
    }

    pub fn derive(slope: u8, noise_level: u8, scores: &SubScores) -> Vec<Self> {
        let mut tags = Vec::new();
        if slope < 5 {
            tags.push(Self::FlatTerrain);
        } else if slope > 15 {
            tags.push(Self::SteepClimb);
        }
        if noise_level > 70 {
            tags.push(Self::NoiseCaution);
        }
        if scores.living_infra > 80 {
            tags.push(Self::NearStation);
        }
        if scores.traffic > 80 {
            tags.push(Self::TransitHub);
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_terrain_noise_and_transit_tags() {
        let mut scores = SubScores::uniform(50);
        scores.living_infra = 81;
        scores.traffic = 95;

        let tags = FeatureTag::derive(17, 71, &scores);
        assert_eq!(
            tags,
            vec![
                FeatureTag::SteepClimb,
                FeatureTag::NoiseCaution,
                FeatureTag::NearStation,
                FeatureTag::TransitHub
            ]
        );
    }

    #[test]
    fn moderate_listing_has_no_tags() {
        let tags = FeatureTag::derive(8, 70, &SubScores::uniform(80));
        assert!(tags.is_empty());
    }
}
