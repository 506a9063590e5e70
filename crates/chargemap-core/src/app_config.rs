use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Browser origins allowed to call the HTTP API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Open Charge Map export read by the importer.
    pub data_path: PathBuf,
    pub cors_origins: CorsOrigins,
}

/// The subset of [`AppConfig`] the offline CLI reads. Server-only variables
/// are never parsed, so a bad bind address cannot break an offline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub log_level: String,
    pub data_path: PathBuf,
}
