//! Shared application service layer for the KPI pipeline.
//!
//! Frontends call into this crate for per-case extraction, batch
//! aggregation across a sweep, and the summary/chart outputs built on top.

pub mod batch;
pub mod case_service;
pub mod charts;
pub mod compare_service;
pub mod error;
pub mod extract;
pub mod options;

// Re-export key types for convenience
pub use batch::{BatchAggregator, BatchOutcome, discover_cases};
pub use case_service::{
    CaseInspection, CasePlotReport, CasePlotStatus, PlotOutcome, PlotRequest, inspect_case,
    plot_cases,
};
pub use charts::{ChartReport, ReportError};
pub use compare_service::{CompareOutcome, CompareRequest, CompareResponse, run_compare};
pub use error::{AppError, AppResult};
pub use extract::{CaseKpiExtractor, CaseSeries, MissingMetric, MissingReason};
pub use options::{ExtractOptions, TimestepOrdering};
