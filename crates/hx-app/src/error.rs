//! Error types for the hx-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates
/// and provides a unified error interface for frontends.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Failed to read sweep directory: {path}")]
    SweepDirRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Series error: {0}")]
    Series(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for hx-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<hx_core::HxError> for AppError {
    fn from(err: hx_core::HxError) -> Self {
        AppError::Registry(err.to_string())
    }
}

impl From<hx_series::SeriesError> for AppError {
    fn from(err: hx_series::SeriesError) -> Self {
        AppError::Series(err.to_string())
    }
}

impl From<hx_results::ResultsError> for AppError {
    fn from(err: hx_results::ResultsError) -> Self {
        AppError::Results(err.to_string())
    }
}
