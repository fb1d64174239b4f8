//! hx-core: stable foundation for the heat-exchanger KPI pipeline.
//!
//! Contains:
//! - numeric (Real + token parsing)
//! - registry (the closed set of KPIs, regions and derived metrics)
//! - case (case folder naming and sweep parameters)
//! - error (shared error types)

pub mod case;
pub mod error;
pub mod numeric;
pub mod registry;

// Re-exports: nice ergonomics for downstream crates
pub use case::{CASE_PREFIX, Case, CaseParams, is_case_folder, parse_case_name};
pub use error::{HxError, HxResult};
pub use numeric::*;
pub use registry::{DerivedMetric, KpiDefinition, KpiRegistry};
