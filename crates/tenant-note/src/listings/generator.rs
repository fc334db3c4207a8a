//! Synthetic listing generation.
//!
//! Randomness comes from an injected [`Rng`] so identical seeds reproduce
//! identical catalogs. [`ListingGenerator::seeded`] wraps `ChaCha8Rng`,
//! which is stable across platforms.

use chrono::{Duration, NaiveDate};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use super::domain::{
    Coordinates, DealType, Heating, HeatingFuel, HeatingMethod, HousingType, Listing,
    ListingDraft, ListingId, Price,
};
use super::scoring::{ScoringEngine, SubScores};

const APARTMENT_NAMES: [&str; 18] = [
    "Sillim Prugio",
    "Gwanak Humansia",
    "Bongcheon Doosan",
    "SNU Station I-One",
    "Daehak-dong Gosichon",
    "Samseongsan Jugong",
    "Sillim Hyundai",
    "Gwanak Park",
    "Bongcheon Woosung",
    "SNU Jarvis",
    "Sillim Dongbu",
    "Bongcheon Byucksan",
    "Gwanak Sanrim",
    "Ilsung Truel",
    "Hyundai Immune",
    "Sillim Doosan",
    "Bongcheon Gwanak",
    "SNU Poonglim",
];

const VILLA_SUFFIXES: [&str; 10] = [
    "Village", "Mansion", "Castle", "Heights", "Suite", "Tower", "State", "House", "Palace",
    "View",
];

/// Bounding box that generated coordinates fall inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationArea {
    pub south_west: Coordinates,
    pub lat_span: f64,
    pub lng_span: f64,
}

impl GenerationArea {
    /// The Sillim-dong neighbourhood of Gwanak-gu, Seoul.
    pub const SILLIM: Self = Self {
        south_west: Coordinates::new(37.47, 126.93),
        lat_span: 0.03,
        lng_span: 0.04,
    };
}

impl Default for GenerationArea {
    fn default() -> Self {
        Self::SILLIM
    }
}

const LISTING_WINDOW_DAYS: i64 = 90;
const MONTHLY_DEAL_SHARE: f64 = 0.7;

pub struct ListingGenerator<R> {
    rng: R,
    engine: ScoringEngine,
    area: GenerationArea,
    reference_date: NaiveDate,
}

impl ListingGenerator<ChaCha8Rng> {
    pub fn seeded(seed: u64, reference_date: NaiveDate) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed), reference_date)
    }
}

impl<R: Rng> ListingGenerator<R> {
    pub fn with_rng(rng: R, reference_date: NaiveDate) -> Self {
        Self {
            rng,
            engine: ScoringEngine::standard(),
            area: GenerationArea::default(),
            reference_date,
        }
    }

    pub fn with_area(mut self, area: GenerationArea) -> Self {
        self.area = area;
        self
    }

    pub fn with_engine(mut self, engine: ScoringEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Produce `count` finalized listings with ids `0..count`.
    pub fn generate(&mut self, count: usize) -> Vec<Listing> {
        let listings: Vec<Listing> = (0..count)
            .map(|index| {
                let id = ListingId(u32::try_from(index).unwrap_or(u32::MAX));
                self.draft(id).finalize(&self.engine)
            })
            .collect();

        debug!(count = listings.len(), "generated synthetic listings");
        listings
    }

    fn draft(&mut self, id: ListingId) -> ListingDraft {
        let housing_type = HousingType::ordered()[self.rng.gen_range(0..4)];
        let name = self.name_for(housing_type);
        let heating = self.heating_for(housing_type);

        let coordinates = Coordinates::new(
            self.area.south_west.lat + self.rng.gen::<f64>() * self.area.lat_span,
            self.area.south_west.lng + self.rng.gen::<f64>() * self.area.lng_span,
        );

        let slope: u8 = match housing_type {
            HousingType::Apt => self.rng.gen_range(0..=9),
            _ => self.rng.gen_range(0..=20),
        };
        let noise_level: u8 = self.rng.gen_range(40..=79);
        let scores = self.scores_for(slope, noise_level);

        let deal_type = if self.rng.gen_bool(MONTHLY_DEAL_SHARE) {
            DealType::Monthly
        } else {
            DealType::Jeonse
        };
        let price = Price {
            deposit: self.rng.gen_range(5_000..=54_999),
            monthly: match deal_type {
                DealType::Monthly => self.rng.gen_range(1..=199),
                DealType::Jeonse => 0,
            },
        };

        let listed_on =
            self.reference_date - Duration::days(self.rng.gen_range(0..LISTING_WINDOW_DAYS));

        ListingDraft {
            id,
            name,
            housing_type,
            deal_type,
            coordinates,
            price,
            size: self.rng.gen_range(10..=39),
            slope,
            noise_level,
            heating,
            scores,
            listed_on,
        }
    }

    fn name_for(&mut self, housing_type: HousingType) -> String {
        match housing_type {
            HousingType::Apt => {
                APARTMENT_NAMES[self.rng.gen_range(0..APARTMENT_NAMES.len())].to_string()
            }
            _ => {
                let suffix = VILLA_SUFFIXES[self.rng.gen_range(0..VILLA_SUFFIXES.len())];
                let unit: u16 = self.rng.gen_range(100..=999);
                format!("{suffix} {unit}")
            }
        }
    }

    fn heating_for(&mut self, housing_type: HousingType) -> Heating {
        let roll: f64 = self.rng.gen();
        let (method, fuel) = match housing_type {
            HousingType::Apt if roll < 0.4 => {
                (HeatingMethod::District, HeatingFuel::CombinedHeatPower)
            }
            HousingType::Apt if roll < 0.8 => (HeatingMethod::Individual, HeatingFuel::CityGas),
            HousingType::Apt => (HeatingMethod::Central, HeatingFuel::CityGas),
            HousingType::Op if roll < 0.3 => {
                (HeatingMethod::District, HeatingFuel::CombinedHeatPower)
            }
            HousingType::Op => (HeatingMethod::Individual, HeatingFuel::CityGas),
            HousingType::Yh | HousingType::Dd if roll < 0.05 => {
                (HeatingMethod::Individual, HeatingFuel::OilLpg)
            }
            HousingType::Yh | HousingType::Dd => (HeatingMethod::Individual, HeatingFuel::CityGas),
        };
        Heating { method, fuel }
    }

    /// Comfort loses three points per degree of slope beyond 5, and the
    /// environment score drops by 20 once noise reaches 65 dB.
    fn scores_for(&mut self, slope: u8, noise_level: u8) -> SubScores {
        let comfort_base: i32 = self.rng.gen_range(60..=99);
        let slope_penalty = i32::from(slope.saturating_sub(5)) * 3;
        let environment_base: i32 = self.rng.gen_range(0..=99);
        let noise_penalty = if noise_level >= 65 { 20 } else { 0 };

        SubScores {
            traffic: self.rng.gen_range(0..=99),
            property_building: self.rng.gen_range(40..=99),
            security_safety: self.rng.gen_range(40..=99),
            living_comfort: floor_score(comfort_base - slope_penalty),
            living_infra: self.rng.gen_range(0..=99),
            environment: floor_score(environment_base - noise_penalty),
        }
    }
}

const SCORE_FLOOR: i32 = 10;

fn floor_score(raw: i32) -> u8 {
    u8::try_from(raw.clamp(SCORE_FLOOR, 100)).unwrap_or(SCORE_FLOOR as u8)
}
