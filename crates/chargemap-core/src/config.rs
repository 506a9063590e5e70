use std::path::PathBuf;

use crate::app_config::{AppConfig, CliConfig, CorsOrigins, Environment};
use crate::ConfigError;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_DATA_PATH: &str = "./data/ocm_finland_raw.json";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but holds an invalid value.
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
/// Returns `ConfigError` if a variable is present but holds an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Load the CLI's settings from `.env` and the process environment.
///
/// Only `CHARGEMAP_LOG_LEVEL` and `CHARGEMAP_DATA_PATH` are read; neither can
/// be invalid, so this never fails.
#[must_use]
pub fn load_cli_config() -> CliConfig {
    dotenvy::dotenv().ok();
    build_cli_config(|key| std::env::var(key))
}

fn build_cli_config<F>(lookup: F) -> CliConfig
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    CliConfig {
        log_level: lookup("CHARGEMAP_LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
        data_path: PathBuf::from(
            lookup("CHARGEMAP_DATA_PATH").unwrap_or_else(|_| DEFAULT_DATA_PATH.to_string()),
        ),
    }
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("CHARGEMAP_ENV", "development"))?;
    let bind_addr = parse_addr("CHARGEMAP_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("CHARGEMAP_LOG_LEVEL", DEFAULT_LOG_LEVEL);
    let data_path = PathBuf::from(or_default("CHARGEMAP_DATA_PATH", DEFAULT_DATA_PATH));
    let cors_origins = parse_cors_origins(&or_default(
        "CHARGEMAP_CORS_ORIGINS",
        "http://localhost:5173",
    ))?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        data_path,
        cors_origins,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s.trim() {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CHARGEMAP_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

/// Parse a comma-separated origin list; `*` anywhere in the list allows any origin.
fn parse_cors_origins(raw: &str) -> Result<CorsOrigins, ConfigError> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect();

    if origins.iter().any(|o| o == "*") {
        return Ok(CorsOrigins::Any);
    }

    if let Some(bad) = origins
        .iter()
        .find(|o| !(o.starts_with("http://") || o.starts_with("https://")))
    {
        return Err(ConfigError::InvalidEnvVar {
            var: "CHARGEMAP_CORS_ORIGINS".to_string(),
            reason: format!("origin \"{bad}\" must start with http:// or https://"),
        });
    }

    Ok(CorsOrigins::List(origins))
}
