use std::path::PathBuf;
use std::str::FromStr;

use crate::app_config::{AppConfig, DirectorySource, Environment};
use crate::ConfigError;

pub const DEFAULT_CATALOG_URL: &str =
    "https://mc-api.marketcheck.com/v2/car/dealer/inventory/active";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it from a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let catalog_api_key = require("DEALSCOUT_CATALOG_API_KEY")?;
    let catalog_url = or_default("DEALSCOUT_CATALOG_URL", DEFAULT_CATALOG_URL);

    let env = parse_environment(&or_default("DEALSCOUT_ENV", "development"))?;
    let log_level = or_default("DEALSCOUT_LOG_LEVEL", "info");

    let directory = match lookup("DEALSCOUT_DIRECTORY_URL") {
        Ok(base_url) if !base_url.trim().is_empty() => DirectorySource::Rest {
            base_url,
            api_key: require("DEALSCOUT_DIRECTORY_KEY")?,
        },
        _ => match lookup("DEALSCOUT_DEALERS_PATH") {
            Ok(path) if !path.trim().is_empty() => DirectorySource::File(PathBuf::from(path)),
            _ => return Err(ConfigError::MissingEnvVar("DEALSCOUT_DIRECTORY_URL".to_string())),
        },
    };

    let request_timeout_secs = parse_num(&lookup, "DEALSCOUT_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("DEALSCOUT_USER_AGENT", "dealscout/0.1 (inventory-search)");
    let page_size = parse_num(&lookup, "DEALSCOUT_PAGE_SIZE", "50")?;
    let max_pages = parse_num(&lookup, "DEALSCOUT_MAX_PAGES", "10")?;
    let inter_page_delay_ms = parse_num(&lookup, "DEALSCOUT_INTER_PAGE_DELAY_MS", "250")?;
    let suggest_debounce_ms = parse_num(&lookup, "DEALSCOUT_SUGGEST_DEBOUNCE_MS", "300")?;
    let status_settle_ms = parse_num(&lookup, "DEALSCOUT_STATUS_SETTLE_MS", "300")?;
    let suggestion_limit = parse_num(&lookup, "DEALSCOUT_SUGGESTION_LIMIT", "10")?;
    let results_per_page = parse_num(&lookup, "DEALSCOUT_RESULTS_PER_PAGE", "21")?;

    if page_size == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "DEALSCOUT_PAGE_SIZE".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    if results_per_page == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "DEALSCOUT_RESULTS_PER_PAGE".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        log_level,
        catalog_api_key,
        catalog_url,
        directory,
        request_timeout_secs,
        user_agent,
        page_size,
        max_pages,
        inter_page_delay_ms,
        suggest_debounce_ms,
        status_settle_ms,
        suggestion_limit,
        results_per_page,
    })
}

fn parse_num<F, T>(lookup: &F, var: &str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(var).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "DEALSCOUT_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
