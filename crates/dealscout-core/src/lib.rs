pub mod app_config;
pub mod budget;
pub mod config;
pub mod dealers;
pub mod filters;
pub mod pagination;
pub mod status;
pub mod vehicles;

pub use app_config::{AppConfig, DirectorySource, Environment};
pub use budget::{parse_qualified_amount, refine_to_budget, BudgetError};
pub use config::{load_app_config, load_app_config_from_env};
pub use dealers::{load_dealers, names_match, Dealer, DealersFile, ResolvedDealer};
pub use filters::{
    apply_filters, available_options, FilterField, FilterOptions, Filters, MILEAGE_CHOICES,
};
pub use pagination::{page, page_count, RESULTS_PER_PAGE};
pub use status::{DealerStatus, ProbeToken, StatusTracker};
pub use vehicles::{estimate_monthly_payment, NoInventoryInfo, Vehicle};

use thiserror::Error;

/// Errors raised while loading runtime configuration.
///
/// Any of these is fatal to a session: nothing can be searched without the
/// catalog credentials and a dealer directory.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read dealers file {path}: {source}")]
    DealersFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dealers file: {0}")]
    DealersFileParse(#[source] serde_yaml::Error),

    #[error("dealers file validation failed: {0}")]
    Validation(String),
}
