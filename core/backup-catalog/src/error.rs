//! Error types for the backup catalog engine.
//!
//! All public APIs return `CatalogResult<T>`: no panics in library code.

use thiserror::Error;

/// Unified error type for all catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Standard I/O error (metadata reads, part directory stat, remote streams)
    #[error("io error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Metadata directory traversal error
    #[error("walk error: {source}")]
    Walk {
        #[from]
        source: walkdir::Error,
    },

    /// Table metadata JSON could not be decoded
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Remote storage reported a failure
    #[error("storage error: {0}")]
    Storage(String),

    /// Create query has no recognizable CREATE/ATTACH prefix
    #[error("can't replace database `{source_database}` to `{target_database}` in query: {query}")]
    RemapImpossible {
        source_database: String,
        target_database: String,
        query: String,
    },

    /// Catalog build was cancelled by the caller
    #[error("operation cancelled")]
    Cancelled,

    /// Invalid configuration value or operator argument
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for all catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

// From 구현들
impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Serialization(err.to_string())
    }
}
