use std::path::PathBuf;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to a value that does not parse.
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
/// Returns `ConfigError` if a variable is set to a value that does not parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected a boolean, got '{other}'"),
            }),
        }
    };

    let env = parse_environment(&or_default("SHOPFRONT_ENV", "development"))?;
    let log_level = or_default("SHOPFRONT_LOG_LEVEL", "info");

    let catalog_base_url = or_default("SHOPFRONT_CATALOG_BASE_URL", "https://dummyjson.com");
    if !(catalog_base_url.starts_with("http://") || catalog_base_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "SHOPFRONT_CATALOG_BASE_URL".to_string(),
            reason: format!("'{catalog_base_url}' is not an http(s) URL"),
        });
    }

    let request_timeout_secs = parse_u64("SHOPFRONT_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SHOPFRONT_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let user_agent = or_default("SHOPFRONT_USER_AGENT", "shopfront/0.1 (catalog-client)");
    let storage_dir = PathBuf::from(or_default("SHOPFRONT_STORAGE_DIR", "./.shopfront"));

    let cart_key = or_default("SHOPFRONT_CART_KEY", "cart");
    validate_storage_key(&cart_key)?;

    let discard_stale_responses = parse_bool("SHOPFRONT_DISCARD_STALE_RESPONSES", "false")?;

    Ok(AppConfig {
        env,
        log_level,
        catalog_base_url,
        request_timeout_secs,
        user_agent,
        storage_dir,
        cart_key,
        discard_stale_responses,
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
            var: "SHOPFRONT_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

/// `true` if `key` is non-empty and uses only `[A-Za-z0-9_-]`.
///
/// Storage keys become file names, so nothing else is accepted.
#[must_use]
pub fn is_valid_storage_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn validate_storage_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_storage_key(key) {
        Ok(())
    } else {
        Err(ConfigError::InvalidEnvVar {
            var: "SHOPFRONT_CART_KEY".to_string(),
            reason: format!("'{key}' must be non-empty and use only [A-Za-z0-9_-]"),
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
