use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a whole import. Per-record defects never surface here.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("OCM file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read OCM file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("OCM format error: {reason}")]
    Format { reason: String },
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("import task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
