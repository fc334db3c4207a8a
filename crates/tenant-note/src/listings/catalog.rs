use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use super::domain::{Listing, ListingId};
use super::filter::{filter_listings, FilterState};
use super::generator::ListingGenerator;
use super::markers::{MarkerClusterer, MarkerIndex};

pub const DEFAULT_VISIBLE_COUNT: usize = 20;

/// Immutable listing collection shared between pipeline runs.
#[derive(Debug, Clone)]
pub struct ListingCatalog {
    listings: Arc<[Listing]>,
    generated_at: DateTime<Utc>,
}

impl ListingCatalog {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self {
            listings: listings.into(),
            generated_at: Utc::now(),
        }
    }

    /// Generate `count` listings from a seeded source.
    pub fn generate(count: usize, seed: u64, reference_date: NaiveDate) -> Self {
        let listings = ListingGenerator::seeded(seed, reference_date).generate(count);
        info!(count, seed, %reference_date, "listing catalog generated");
        Self::new(listings)
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn get(&self, id: ListingId) -> Option<&Listing> {
        self.listings.iter().find(|listing| listing.id() == id)
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }
}

/// Filter then cluster. Each run reads one `FilterState` snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListingPipeline {
    clusterer: MarkerClusterer,
}

impl ListingPipeline {
    pub fn new(clusterer: MarkerClusterer) -> Self {
        Self { clusterer }
    }

    pub fn clusterer(&self) -> &MarkerClusterer {
        &self.clusterer
    }

    pub fn run<'a>(&self, catalog: &'a ListingCatalog, state: &FilterState) -> PipelineRun<'a> {
        let filtered = filter_listings(catalog.listings(), state);
        let markers = self.clusterer.cluster(filtered.iter().copied());
        PipelineRun { filtered, markers }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineRun<'a> {
    filtered: Vec<&'a Listing>,
    markers: MarkerIndex<'a>,
}

impl<'a> PipelineRun<'a> {
    pub fn filtered(&self) -> &[&'a Listing] {
        &self.filtered
    }

    pub fn markers(&self) -> &MarkerIndex<'a> {
        &self.markers
    }

    /// First `visible_count` filtered listings.
    pub fn page(&self, visible_count: usize) -> ListingPage<'a> {
        let shown = visible_count.min(self.filtered.len());
        ListingPage {
            items: self.filtered[..shown].to_vec(),
            total: self.filtered.len(),
            visible_count,
            has_more: self.filtered.len() > shown,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage<'a> {
    pub items: Vec<&'a Listing>,
    pub total: usize,
    pub visible_count: usize,
    pub has_more: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::domain::DealType;

    fn catalog() -> ListingCatalog {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date");
        ListingCatalog::generate(120, 9, date)
    }

    #[test]
    fn lookup_by_id() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 120);
        let listing = catalog.get(ListingId(17)).expect("listing exists");
        assert_eq!(listing.id(), ListingId(17));
        assert!(catalog.get(ListingId(500)).is_none());
    }

    #[test]
    fn pipeline_clusters_only_filtered_listings() {
        let catalog = catalog();
        let run = ListingPipeline::default().run(&catalog, &FilterState::default());

        assert!(run
            .filtered()
            .iter()
            .all(|listing| listing.deal_type() == DealType::Monthly));
        assert_eq!(run.markers().listing_count(), run.filtered().len());
    }

    #[test]
    fn page_reports_total_and_remaining() {
        let catalog = catalog();
        let run = ListingPipeline::default().run(&catalog, &FilterState::default());
        let total = run.filtered().len();
        assert!(total > DEFAULT_VISIBLE_COUNT);

        let page = run.page(DEFAULT_VISIBLE_COUNT);
        assert_eq!(page.items.len(), DEFAULT_VISIBLE_COUNT);
        assert_eq!(page.total, total);
        assert!(page.has_more);

        let everything = run.page(total + 5);
        assert_eq!(everything.items.len(), total);
        assert!(!everything.has_more);
    }

    #[test]
    fn empty_catalog_runs_cleanly() {
        let catalog = ListingCatalog::new(Vec::new());
        let run = ListingPipeline::default().run(&catalog, &FilterState::default());
        assert!(run.filtered().is_empty());
        assert!(run.markers().is_empty());
        let page = run.page(DEFAULT_VISIBLE_COUNT);
        assert_eq!(page.total, 0);
        assert!(!page.has_more);
    }
}
