use crate::sync_config::{SourceCredentials, SyncConfig};
use crate::ConfigError;

/// Load sync configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_sync_config() -> Result<SyncConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_sync_config_from_env()
}

/// Load sync configuration from environment variables already in the process.
///
/// Unlike [`load_sync_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_sync_config_from_env() -> Result<SyncConfig, ConfigError> {
    build_sync_config(|key| std::env::var(key))
}

/// Build sync configuration using the provided env-var lookup function.
///
/// Empty values are treated the same as unset ones.
fn build_sync_config<F>(lookup: F) -> Result<SyncConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let optional = |var: &str| -> Option<String> { lookup(var).ok().filter(|v| !v.is_empty()) };

    let require = |var: &str| -> Result<String, ConfigError> {
        optional(var).ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default =
        |var: &str, default: &str| -> String { optional(var).unwrap_or_else(|| default.to_string()) };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let catalog_url = require("CATALOG_URL")?;
    let catalog_service_key = require("CATALOG_SERVICE_KEY")?;

    let source_language = or_default("SOURCE_LANGUAGE", "nl");
    let source_country = or_default("SOURCE_COUNTRY", "BE");

    let credentials = match optional("REFRESH_CREDENTIAL") {
        Some(token) => SourceCredentials::RefreshToken(token),
        None => match (optional("ACCOUNT_PHONE"), optional("ACCOUNT_PASSWORD")) {
            (Some(phone), Some(password)) => SourceCredentials::Account { phone, password },
            _ => return Err(ConfigError::MissingCredentials),
        },
    };

    let log_level = or_default("PANTRYSYNC_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("PANTRYSYNC_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("PANTRYSYNC_USER_AGENT", "pantrysync/0.1 (receipt-sync)");

    Ok(SyncConfig {
        catalog_url,
        catalog_service_key,
        source_language,
        source_country,
        credentials,
        log_level,
        request_timeout_secs,
        user_agent,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
