use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_DATASET_URL: &str = "https://raw.githubusercontent.com/aswaathb/covid19india-react/80922c70bb451cda94cce1e809e54fa72754f05c/newResources/geoResources.json";
pub const DEFAULT_GEOCODE_URL: &str = "https://api.bigdatacloud.net/data/reverse-geocode-client";

/// Medical identifiers run from 1, general identifiers from this base, so the
/// medical result cap must stay below it.
const GENERAL_ID_BASE: usize = 100;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can use a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let value = or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value == 0 {
            return Err(invalid(var, "must be greater than zero".to_string()));
        }
        Ok(value)
    };

    let parse_positive_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let value = or_default(var, default)
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if !value.is_finite() || value <= 0.0 {
            return Err(invalid(var, "must be a positive number".to_string()));
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("NEARBY_ENV", "development"));
    let bind_addr = parse_addr("NEARBY_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("NEARBY_LOG_LEVEL", "info");

    let dataset_url = or_default("NEARBY_DATASET_URL", DEFAULT_DATASET_URL);
    let geocode_url = or_default("NEARBY_GEOCODE_URL", DEFAULT_GEOCODE_URL);
    let locality_language = or_default("NEARBY_LOCALITY_LANGUAGE", "en");

    let http_timeout_secs = parse_u64("NEARBY_HTTP_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("NEARBY_USER_AGENT", "nearby/0.1 (essentials-locator)");
    let fetch_max_retries = parse_u32("NEARBY_FETCH_MAX_RETRIES", "0")?;
    let fetch_backoff_base_ms = parse_u64("NEARBY_FETCH_BACKOFF_BASE_MS", "500")?;

    let medical_max_results = parse_positive_usize("NEARBY_MEDICAL_MAX_RESULTS", "5")?;
    if medical_max_results >= GENERAL_ID_BASE {
        return Err(invalid(
            "NEARBY_MEDICAL_MAX_RESULTS",
            format!("must be below {GENERAL_ID_BASE} so medical and general ids cannot overlap"),
        ));
    }
    let general_max_results = parse_positive_usize("NEARBY_GENERAL_MAX_RESULTS", "100")?;
    let general_max_distance_m = parse_positive_f64("NEARBY_GENERAL_MAX_DISTANCE_M", "10000")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        dataset_url,
        geocode_url,
        locality_language,
        http_timeout_secs,
        user_agent,
        fetch_max_retries,
        fetch_backoff_base_ms,
        medical_max_results,
        general_max_results,
        general_max_distance_m,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
