use rust_decimal::Decimal;
use thiserror::Error;

use crate::app_config::AppConfig;
use crate::costs::UnitCosts;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars,
/// so the API key can live in a local, untracked secrets file.
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
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
///
/// # Errors
///
/// Same as [`load_app_config_from_env`].
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
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

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_cost = |var: &str, default: Decimal| -> Result<Decimal, ConfigError> {
        let Ok(raw) = lookup(var) else {
            return Ok(default);
        };
        let cost = raw
            .trim()
            .parse::<Decimal>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })?;
        if cost.is_sign_negative() {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "cost must not be negative".to_string(),
            });
        }
        Ok(cost)
    };

    let places_api_key = require("GOOGLE_PLACES_API_KEY")?;

    let places_base_url = or_default(
        "STATIONDB_PLACES_BASE_URL",
        "https://places.googleapis.com/v1",
    );
    let log_level = or_default("STATIONDB_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("STATIONDB_REQUEST_TIMEOUT_SECS", "30")?;
    let max_retries = parse_u32("STATIONDB_MAX_RETRIES", "0")?;
    let retry_backoff_base_ms = parse_u64("STATIONDB_RETRY_BACKOFF_BASE_MS", "1000")?;

    let region = or_default("STATIONDB_REGION", "Pennsylvania");
    let language_code = or_default("STATIONDB_LANGUAGE_CODE", "en");
    let match_threshold = parse_threshold(&or_default("STATIONDB_MATCH_THRESHOLD", "0.85"))?;

    let max_concurrent_records = parse_usize("STATIONDB_MAX_CONCURRENT_RECORDS", "1")?;
    if max_concurrent_records == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "STATIONDB_MAX_CONCURRENT_RECORDS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let projection_records = parse_usize("STATIONDB_PROJECTION_RECORDS", "12627")?;

    let defaults = UnitCosts::default();
    let unit_costs = UnitCosts {
        text_search: parse_cost("STATIONDB_COST_TEXT_SEARCH", defaults.text_search)?,
        details_basic: parse_cost("STATIONDB_COST_DETAILS_BASIC", defaults.details_basic)?,
        details_contact: parse_cost("STATIONDB_COST_DETAILS_CONTACT", defaults.details_contact)?,
        details_atmosphere: parse_cost(
            "STATIONDB_COST_DETAILS_ATMOSPHERE",
            defaults.details_atmosphere,
        )?,
    };

    Ok(AppConfig {
        places_api_key,
        places_base_url,
        log_level,
        request_timeout_secs,
        max_retries,
        retry_backoff_base_ms,
        region,
        language_code,
        match_threshold,
        max_concurrent_records,
        projection_records,
        unit_costs,
    })
}

/// Parse a match threshold, which must be a finite value in `[0, 1]`.
fn parse_threshold(raw: &str) -> Result<f64, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        var: "STATIONDB_MATCH_THRESHOLD".to_string(),
        reason,
    };
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| invalid(e.to_string()))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid(format!("{value} is outside [0, 1]")));
    }
    Ok(value)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
