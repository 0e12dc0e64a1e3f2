use crate::app_config::{AppConfig, PLACEHOLDER_API_KEY, PLACEHOLDER_ENDPOINT};
use crate::ConfigError;

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
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
///
/// Missing credentials fall back to placeholder strings instead of failing;
/// the server warns about them at startup and every analysis call made with
/// them fails at request time.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::{Ipv4Addr, SocketAddr};

    let or_default = |var: &str, default: &str| -> String {
        lookup(var)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default.to_string())
    };

    let parse_u16 = |var: &str, default: &str| -> Result<u16, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let endpoint = or_default("ENDPOINT", PLACEHOLDER_ENDPOINT);
    let api_key = or_default("TEXT_ANALYTICS_API_KEY", PLACEHOLDER_API_KEY);

    let port = parse_u16("PORT", "8000")?;
    let bind_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));

    let log_level = or_default("TEXTSENSE_LOG_LEVEL", "info");
    let language = or_default("TEXT_ANALYTICS_LANGUAGE", "en");

    let analytics_timeout_secs = parse_u64("TEXT_ANALYTICS_TIMEOUT_SECS", "30")?;
    if analytics_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "TEXT_ANALYTICS_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(AppConfig {
        endpoint,
        api_key,
        bind_addr,
        log_level,
        language,
        analytics_timeout_secs,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
