pub mod app_config;
pub mod config;
pub mod product;
pub mod sites;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use product::{ExtractionResult, Field, StructuredProductRecord};
pub use sites::{load_site_table, parse_site_table, SiteSelectors, SiteTable};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read site table {path}: {source}")]
    SiteTableIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse site table: {0}")]
    SiteTableParse(#[from] serde_yaml::Error),

    #[error("site table validation failed: {0}")]
    Validation(String),
}
