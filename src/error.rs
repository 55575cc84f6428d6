//! Error types for the schema graph core

use std::path::PathBuf;
use thiserror::Error;

/// Result type for schema graph operations
pub type Result<T> = std::result::Result<T, SchemaGraphError>;

/// Errors at the I/O and configuration boundary.
///
/// Graph building, classification, and layout are total over their input
/// domain and never return these; only loading, configuration, and export
/// serialization do.
#[derive(Error, Debug)]
pub enum SchemaGraphError {
    #[error("Failed to read schema directory {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}
