pub mod catalog;
pub mod display;
pub mod domain;
pub mod export;
pub mod features;
pub mod filter;
pub mod generator;
pub mod markers;
pub mod scoring;
pub mod swot;

pub use catalog::{ListingCatalog, ListingPage, ListingPipeline, PipelineRun, DEFAULT_VISIBLE_COUNT};
pub use display::{format_price, AreaUnit};
pub use domain::{
    Coordinates, DealType, Heating, HeatingFuel, HeatingMethod, HousingType, Listing, ListingDraft,
    ListingId, Price,
};
pub use export::{write_grid, ExportError};
pub use features::FeatureTag;
pub use filter::{
    filter_listings, filter_with_bounds, AmountRange, BudgetBounds, BudgetInput, FilterCommand,
    FilterState, SizeBucket,
};
pub use generator::{GenerationArea, ListingGenerator};
pub use markers::{CoordinateKey, MarkerClusterer, MarkerGroup, MarkerIndex, MarkerKind, MarkerView};
pub use scoring::{
    Grade, GradeThresholds, ScoreCard, ScoreComponent, ScoreFactor, ScoreWeights, ScoringEngine,
    SubScores,
};
pub use swot::{Swot, SwotTag};
