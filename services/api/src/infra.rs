use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use tenant_note::listings::{
    DealType, FilterCommand, FilterState, HousingType, ListingCatalog, ListingPipeline,
    ScoringEngine, SizeBucket,
};
use tenant_note::regions::{GradeHashScheme, Region, RegionGradeSimulator, ViewMode};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Listing catalog, live filter configuration, and region slot shared by
/// every handler.
///
/// Filter mutations take the write lock; each pipeline run clones a
/// snapshot under the read lock so it never observes a half-applied command.
#[derive(Clone)]
pub(crate) struct PipelineState {
    pub(crate) catalog: ListingCatalog,
    pub(crate) pipeline: ListingPipeline,
    pub(crate) engine: ScoringEngine,
    pub(crate) simulator: RegionGradeSimulator,
    filters: Arc<RwLock<FilterState>>,
    regions: Arc<OnceLock<Vec<Region>>>,
}

impl PipelineState {
    pub(crate) fn new(catalog: ListingCatalog, scheme: GradeHashScheme) -> Self {
        Self {
            catalog,
            pipeline: ListingPipeline::default(),
            engine: ScoringEngine::standard(),
            simulator: RegionGradeSimulator::new(scheme),
            filters: Arc::new(RwLock::new(FilterState::default())),
            regions: Arc::new(OnceLock::new()),
        }
    }

    pub(crate) fn filter_snapshot(&self) -> FilterState {
        self.filters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn apply_filter(&self, command: FilterCommand) -> FilterState {
        let mut guard = self.filters.write().unwrap_or_else(PoisonError::into_inner);
        guard.apply(command);
        guard.clone()
    }

    /// Install fetched regions. Only the first delivery is kept.
    pub(crate) fn install_regions(&self, regions: Vec<Region>) -> bool {
        let count = regions.len();
        let installed = self.regions.set(regions).is_ok();
        if installed {
            info!(regions = count, "choropleth regions installed");
        }
        installed
    }

    pub(crate) fn regions(&self) -> Option<&[Region]> {
        self.regions.get().map(Vec::as_slice)
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_housing_type(raw: &str) -> Result<HousingType, String> {
    HousingType::from_code(raw)
        .ok_or_else(|| format!("unknown housing type '{raw}' (expected APT, OP, YH or DD)"))
}

pub(crate) fn parse_deal_type(raw: &str) -> Result<DealType, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "monthly" => Ok(DealType::Monthly),
        "jeonse" => Ok(DealType::Jeonse),
        _ => Err(format!("unknown deal type '{raw}' (expected monthly or jeonse)")),
    }
}

pub(crate) fn parse_size_bucket(raw: &str) -> Result<SizeBucket, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "all" => Ok(SizeBucket::All),
        "under10" => Ok(SizeBucket::Under10),
        "10to20" => Ok(SizeBucket::From10To20),
        "over30" => Ok(SizeBucket::Over30),
        _ => Err(format!(
            "unknown size bucket '{raw}' (expected all, under10, 10to20 or over30)"
        )),
    }
}

pub(crate) fn parse_view_mode(raw: &str) -> Result<ViewMode, String> {
    raw.parse::<ViewMode>().map_err(|err| err.to_string())
}

pub(crate) fn parse_hash_scheme(raw: &str) -> Result<GradeHashScheme, String> {
    GradeHashScheme::from_token(raw)
        .ok_or_else(|| format!("unknown hash scheme '{raw}' (expected fnv1a or char_sum)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenant_note::listings::Grade;

    fn state() -> PipelineState {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date");
        PipelineState::new(ListingCatalog::generate(10, 1, date), GradeHashScheme::Fnv1a)
    }

    #[test]
    fn filter_commands_update_shared_snapshot() {
        let state = state();
        let shared = state.clone();
        shared.apply_filter(FilterCommand::ToggleGrade { grade: Grade::B });
        assert!(!state.filter_snapshot().grades.contains(&Grade::B));

        state.apply_filter(FilterCommand::Reset);
        assert_eq!(shared.filter_snapshot(), FilterState::default());
    }

    #[test]
    fn regions_install_only_once() {
        let state = state();
        assert!(state.regions().is_none());
        assert!(state.install_regions(Vec::new()));
        assert!(!state.install_regions(Vec::new()));
        assert_eq!(state.regions().map(<[Region]>::len), Some(0));
    }

    #[test]
    fn cli_value_parsers_accept_documented_tokens() {
        assert_eq!(parse_deal_type("Jeonse"), Ok(DealType::Jeonse));
        assert_eq!(parse_size_bucket("10to20"), Ok(SizeBucket::From10To20));
        assert_eq!(parse_housing_type("yh"), Ok(HousingType::Yh));
        assert_eq!(parse_view_mode("infra"), Ok(ViewMode::Infra));
        assert!(parse_hash_scheme("crc").is_err());
        assert!(parse_date("2025-13-01").is_err());
    }
}
