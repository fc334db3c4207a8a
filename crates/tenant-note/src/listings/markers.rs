//! Coordinate-keyed marker grouping.
//!
//! Listings whose latitude and longitude round to the same decimal grid
//! share one marker. Groups keep first-discovery order and a hash index
//! from key to group so re-rendering never needs a linear scan.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use super::domain::{Coordinates, Listing, ListingId};

/// Five decimals, roughly 1.1 m at Seoul's latitude.
pub const DEFAULT_PRECISION: u32 = 5;
const MAX_PRECISION: u32 = 9;

/// Rounded coordinate pair, stored as integer grid units so equality is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordinateKey {
    lat_units: i64,
    lng_units: i64,
    precision: u32,
}

impl CoordinateKey {
    pub fn new(coordinates: Coordinates, precision: u32) -> Self {
        let precision = precision.min(MAX_PRECISION);
        let scale = 10f64.powi(precision as i32);
        Self {
            lat_units: (coordinates.lat * scale).round() as i64,
            lng_units: (coordinates.lng * scale).round() as i64,
            precision,
        }
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Grid-snapped position of the key.
    pub fn coordinates(&self) -> Coordinates {
        let scale = 10f64.powi(self.precision as i32);
        Coordinates::new(
            self.lat_units as f64 / scale,
            self.lng_units as f64 / scale,
        )
    }
}

impl fmt::Display for CoordinateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Coordinates { lat, lng } = self.coordinates();
        let digits = self.precision as usize;
        write!(f, "{lat:.digits$},{lng:.digits$}")
    }
}

impl Serialize for CoordinateKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkerKind {
    Single,
    /// `extra` counts listings beyond the lead one shown on the marker.
    Cluster { extra: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerGroup<'a> {
    key: CoordinateKey,
    listings: Vec<&'a Listing>,
}

impl<'a> MarkerGroup<'a> {
    pub fn key(&self) -> CoordinateKey {
        self.key
    }

    /// The listing rendered on the marker itself.
    pub fn lead(&self) -> &'a Listing {
        self.listings[0]
    }

    pub fn listings(&self) -> &[&'a Listing] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn kind(&self) -> MarkerKind {
        match self.listings.len() {
            0 | 1 => MarkerKind::Single,
            size => MarkerKind::Cluster { extra: size - 1 },
        }
    }

    pub fn badge(&self) -> Option<String> {
        match self.kind() {
            MarkerKind::Single => None,
            MarkerKind::Cluster { extra } => Some(format!("+{extra}")),
        }
    }

    pub fn view(&self) -> MarkerView {
        let lead = self.lead();
        MarkerView {
            key: self.key,
            position: lead.coordinates(),
            color: lead.housing_type().marker_color(),
            kind: self.kind(),
            badge: self.badge(),
            listing_ids: self.listings.iter().map(|listing| listing.id()).collect(),
        }
    }
}

/// Owned, serializable summary of a marker group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerView {
    pub key: CoordinateKey,
    pub position: Coordinates,
    pub color: &'static str,
    pub kind: MarkerKind,
    pub badge: Option<String>,
    pub listing_ids: Vec<ListingId>,
}

/// Ordered marker groups plus a key index.
#[derive(Debug, Clone, Default)]
pub struct MarkerIndex<'a> {
    groups: Vec<MarkerGroup<'a>>,
    positions: HashMap<CoordinateKey, usize>,
}

impl<'a> MarkerIndex<'a> {
    fn push(&mut self, key: CoordinateKey, listing: &'a Listing) {
        match self.positions.get(&key) {
            Some(&position) => self.groups[position].listings.push(listing),
            None => {
                self.positions.insert(key, self.groups.len());
                self.groups.push(MarkerGroup {
                    key,
                    listings: vec![listing],
                });
            }
        }
    }

    pub fn get(&self, key: &CoordinateKey) -> Option<&MarkerGroup<'a>> {
        self.positions
            .get(key)
            .and_then(|&position| self.groups.get(position))
    }

    pub fn groups(&self) -> &[MarkerGroup<'a>] {
        &self.groups
    }

    pub fn iter(&self) -> impl Iterator<Item = &MarkerGroup<'a>> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn listing_count(&self) -> usize {
        self.groups.iter().map(MarkerGroup::len).sum()
    }

    pub fn views(&self) -> Vec<MarkerView> {
        self.groups.iter().map(MarkerGroup::view).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerClusterer {
    precision: u32,
}

impl Default for MarkerClusterer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkerClusterer {
    pub const fn new() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
        }
    }

    /// Decimal places kept when rounding; values above 9 are capped.
    pub fn with_precision(precision: u32) -> Self {
        Self {
            precision: precision.min(MAX_PRECISION),
        }
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn key_for(&self, coordinates: Coordinates) -> CoordinateKey {
        CoordinateKey::new(coordinates, self.precision)
    }

    pub fn cluster<'a, I>(&self, listings: I) -> MarkerIndex<'a>
    where
        I: IntoIterator<Item = &'a Listing>,
    {
        let mut index = MarkerIndex::default();
        for listing in listings {
            index.push(self.key_for(listing.coordinates()), listing);
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::domain::{
        DealType, Heating, HeatingFuel, HeatingMethod, HousingType, ListingDraft, Price,
    };
    use crate::listings::scoring::{ScoringEngine, SubScores};
    use chrono::NaiveDate;

    fn at(id: u32, lat: f64, lng: f64) -> Listing {
        ListingDraft {
            id: ListingId(id),
            name: format!("Marker {id}"),
            housing_type: HousingType::Op,
            deal_type: DealType::Monthly,
            coordinates: Coordinates::new(lat, lng),
            price: Price {
                deposit: 1_000,
                monthly: 50,
            },
            size: 12,
            slope: 2,
            noise_level: 45,
            heating: Heating {
                method: HeatingMethod::Individual,
                fuel: HeatingFuel::CityGas,
            },
            scores: SubScores::uniform(70),
            listed_on: NaiveDate::from_ymd_opt(2025, 4, 2).expect("valid date"),
        }
        .finalize(&ScoringEngine::standard())
    }

    #[test]
    fn sub_precision_jitter_merges_into_one_group() {
        let listings = vec![
            at(0, 37.4842, 126.929601),
            at(1, 37.484201, 126.929604),
            at(2, 37.4850, 126.9300),
        ];

        let index = MarkerClusterer::new().cluster(&listings);
        assert_eq!(index.len(), 2);
        assert_eq!(index.listing_count(), 3);

        let first = &index.groups()[0];
        assert_eq!(first.key().to_string(), "37.48420,126.92960");
        assert_eq!(first.len(), 2);
        assert_eq!(first.lead().id(), ListingId(0));
        assert_eq!(first.badge().as_deref(), Some("+1"));

        let second = &index.groups()[1];
        assert_eq!(second.kind(), MarkerKind::Single);
        assert_eq!(second.badge(), None);
    }

    #[test]
    fn coarser_precision_merges_neighbouring_fifth_decimals() {
        let listings = vec![
            at(0, 37.48420, 126.92960),
            at(1, 37.48420, 126.92961),
            at(2, 37.4850, 126.9300),
        ];

        let fine = MarkerClusterer::new().cluster(&listings);
        assert_eq!(fine.len(), 3);

        let coarse = MarkerClusterer::with_precision(4).cluster(&listings);
        assert_eq!(coarse.len(), 2);
        assert_eq!(coarse.groups()[0].len(), 2);
        assert_eq!(coarse.groups()[1].lead().id(), ListingId(2));
    }

    #[test]
    fn groups_keep_first_discovery_order_and_index_lookup() {
        let listings = vec![
            at(0, 37.49, 126.95),
            at(1, 37.48, 126.94),
            at(2, 37.49, 126.95),
            at(3, 37.48, 126.94),
            at(4, 37.48, 126.94),
        ];
        let clusterer = MarkerClusterer::new();
        let index = clusterer.cluster(&listings);

        let leads: Vec<ListingId> = index.iter().map(|group| group.lead().id()).collect();
        assert_eq!(leads, vec![ListingId(0), ListingId(1)]);

        let key = clusterer.key_for(Coordinates::new(37.48, 126.94));
        let group = index.get(&key).expect("group indexed");
        assert_eq!(group.kind(), MarkerKind::Cluster { extra: 2 });
        assert_eq!(group.badge().as_deref(), Some("+2"));
    }

    #[test]
    fn view_serializes_key_and_member_ids() {
        let listings = vec![at(5, 37.4842, 126.9296), at(6, 37.4842, 126.9296)];
        let index = MarkerClusterer::new().cluster(&listings);
        let json = serde_json::to_value(index.views()).expect("serialize");

        assert_eq!(json[0]["key"], "37.48420,126.92960");
        assert_eq!(json[0]["badge"], "+1");
        assert_eq!(json[0]["kind"]["kind"], "cluster");
        assert_eq!(json[0]["listingIds"], serde_json::json!([5, 6]));
        assert_eq!(json[0]["color"], HousingType::Op.marker_color());
    }

    #[test]
    fn empty_input_has_no_markers() {
        let listings: Vec<Listing> = Vec::new();
        let index = MarkerClusterer::new().cluster(&listings);
        assert!(index.is_empty());
    }

    #[test]
    fn precision_is_capped() {
        assert_eq!(MarkerClusterer::with_precision(20).precision(), 9);
    }
}
