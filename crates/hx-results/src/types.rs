//! Result data types.

use std::collections::BTreeMap;

use hx_core::CaseParams;
use serde::Serialize;

/// Column holding the case folder name.
pub const CASE_COLUMN: &str = "case";
/// Column holding the inlet velocity tag.
pub const VELOCITY_COLUMN: &str = "U_air";
/// Column holding the porous inlet temperature tag.
pub const POROUS_TEMPERATURE_COLUMN: &str = "Tpor_in";

/// One row per case: parameters plus a possibly-absent value per metric.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseResult {
    pub case: String,
    pub params: Option<CaseParams>,
    values: BTreeMap<String, Option<f64>>,
}

impl CaseResult {
    pub fn new(case: &str, params: Option<CaseParams>) -> Self {
        Self {
            case: case.to_string(),
            params,
            values: BTreeMap::new(),
        }
    }

    pub fn set(&mut self, metric: &str, value: Option<f64>) {
        self.values.insert(metric.to_string(), value);
    }

    /// Value of `metric`; `None` if absent or never set.
    pub fn get(&self, metric: &str) -> Option<f64> {
        self.values.get(metric).copied().flatten()
    }

    pub fn has_metric(&self, metric: &str) -> bool {
        self.values.contains_key(metric)
    }
}

/// Rows in case-folder order, sharing one metric column order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<CaseResult>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: CaseResult) {
        self.rows.push(row);
    }

    /// Metric columns, without the case and parameter columns.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Full CSV header.
    pub fn header(&self) -> Vec<String> {
        [CASE_COLUMN, VELOCITY_COLUMN, POROUS_TEMPERATURE_COLUMN]
            .iter()
            .map(|c| c.to_string())
            .chain(self.columns.iter().cloned())
            .collect()
    }

    pub fn rows(&self) -> &[CaseResult] {
        &self.rows
    }

    pub fn row(&self, case: &str) -> Option<&CaseResult> {
        self.rows.iter().find(|r| r.case == case)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn case_names(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.case.as_str()).collect()
    }

    /// One entry per row, `None` where the value is absent.
    pub fn column_values(&self, metric: &str) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.get(metric)).collect()
    }

    /// How many rows lack each metric.
    pub fn missing_counts(&self) -> BTreeMap<String, usize> {
        self.columns
            .iter()
            .map(|c| {
                let missing = self.rows.iter().filter(|r| r.get(c).is_none()).count();
                (c.clone(), missing)
            })
            .collect()
    }
}

/// Sidecar describing a written summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryManifest {
    pub generated_at: String,
    pub source_root: String,
    pub case_count: usize,
    pub columns: Vec<String>,
    pub missing: BTreeMap<String, usize>,
}

impl SummaryManifest {
    pub fn for_result_set(results: &ResultSet, source_root: &str) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            source_root: source_root.to_string(),
            case_count: results.len(),
            columns: results.header(),
            missing: results.missing_counts(),
        }
    }
}
