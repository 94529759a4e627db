use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Desktop Chrome UA; several retailers serve a stripped page to unknown agents.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";

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
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

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

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("PRICELENS_ENV", "development"))?;
    let log_level = or_default("PRICELENS_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("PRICELENS_REQUEST_TIMEOUT_SECS", "30")?;
    let pipeline_timeout_secs = parse_u64("PRICELENS_PIPELINE_TIMEOUT_SECS", "60")?;
    if pipeline_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PRICELENS_PIPELINE_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let user_agent = or_default("PRICELENS_USER_AGENT", DEFAULT_USER_AGENT);

    let max_concurrent_scrapes = parse_usize("PRICELENS_MAX_CONCURRENT_SCRAPES", "4")?;
    if max_concurrent_scrapes == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PRICELENS_MAX_CONCURRENT_SCRAPES".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let sites_path = lookup("PRICELENS_SITES_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        env,
        log_level,
        request_timeout_secs,
        pipeline_timeout_secs,
        user_agent,
        max_concurrent_scrapes,
        sites_path,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PRICELENS_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
