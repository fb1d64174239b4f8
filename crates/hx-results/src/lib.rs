//! hx-results: per-case KPI rows and the cross-case summary store.

pub mod store;
pub mod types;

pub use store::{MANIFEST_FILE, SUMMARY_FILE, SummaryStore, write_summary_rows};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
