pub mod catalog;
pub mod config;
pub mod sync_config;

pub use catalog::{CatalogRecord, Category};
pub use config::{load_sync_config, load_sync_config_from_env};
pub use sync_config::{SourceCredentials, SyncConfig};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("missing receipt-source credentials: set REFRESH_CREDENTIAL or both ACCOUNT_PHONE and ACCOUNT_PASSWORD")]
    MissingCredentials,
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),
}
