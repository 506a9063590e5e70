pub mod app_config;
pub mod config;
pub mod locations;

pub use app_config::{AppConfig, CliConfig, CorsOrigins, Environment};
pub use config::{load_app_config, load_app_config_from_env, load_cli_config};
pub use locations::{
    BoundingBox, Location, LocationFilter, DEFAULT_LIMIT, UNKNOWN_NAME, UNKNOWN_OPERATOR,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
