pub mod assessment;
pub mod choropleth;
pub mod domain;
pub mod loader;
pub mod simulator;

pub use assessment::{
    read_indicators, AssessmentError, AssessmentWeights, GradeAssessor, QuantileCutoffs,
    RegionAssessment, RegionIndicators,
};
pub use choropleth::{ChoroplethCell, ChoroplethLayer};
pub use domain::{AdminCode, Region};
pub use loader::{fetch_regions, parse_regions, read_regions, RegionLoadError};
pub use simulator::{GradeHashScheme, RegionGradeSimulator, ViewMode, ViewModeParseError};
