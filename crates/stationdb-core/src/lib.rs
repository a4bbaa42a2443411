pub mod app_config;
pub mod config;
pub mod costs;
pub mod matching;
pub mod records;
pub mod result;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use costs::UnitCosts;
pub use matching::{MatchDecision, MatchMethod};
pub use records::{
    AccessibilityOptions, CandidateDetails, CandidateSummary, OpeningHours, OpeningPeriod,
    PeriodPoint, SourceRecord,
};
pub use result::EnrichmentResult;
