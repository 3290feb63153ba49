//! Error types for repository operations.

use crate::services::validation::ValidationError;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Data validation error: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("Storage error: {0}")]
    StorageError(String),

    /// Stored data was read but could not be decoded.
    #[error("Corrupt data: {0}")]
    CorruptData(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl From<std::io::Error> for RepositoryError {
    fn from(e: std::io::Error) -> Self {
        RepositoryError::StorageError(e.to_string())
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(e: serde_json::Error) -> Self {
        RepositoryError::StorageError(format!("JSON error: {}", e))
    }
}
