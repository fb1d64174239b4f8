//! Batch aggregation over a parameter sweep.

use std::fs;
use std::path::Path;

use hx_core::{Case, is_case_folder};
use hx_results::ResultSet;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::extract::CaseKpiExtractor;

/// Result of a batch run.
#[derive(Debug, Clone)]
pub enum BatchOutcome {
    /// Nothing to aggregate; no output should be produced.
    NoCases,
    Completed(ResultSet),
}

/// Immediate subdirectories of `root` that look like sweep cases, by name.
pub fn discover_cases(root: &Path) -> AppResult<Vec<Case>> {
    let entries = fs::read_dir(root).map_err(|e| AppError::SweepDirRead {
        path: root.to_path_buf(),
        source: e,
    })?;

    let mut cases = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();
        if path.is_dir() && is_case_folder(&name) {
            cases.push(Case::from_dir(&path));
        }
    }
    cases.sort_by(|a, b| a.name().cmp(b.name()));
    Ok(cases)
}

pub struct BatchAggregator {
    extractor: CaseKpiExtractor,
}

impl BatchAggregator {
    pub fn new(extractor: CaseKpiExtractor) -> Self {
        Self { extractor }
    }

    /// Extract final values for every parameterized case under `root`.
    ///
    /// Cases are processed one at a time in name order. Folders whose names
    /// carry no parameters are skipped.
    pub fn run(&self, root: &Path) -> AppResult<BatchOutcome> {
        let cases = discover_cases(root)?;
        let mut results = ResultSet::new(self.extractor.registry().columns().to_vec());

        for case in &cases {
            if case.params().is_none() {
                warn!(case = case.name(), "case name has no sweep parameters, skipping");
                continue;
            }
            let row = self.extractor.extract_final(case)?;
            info!(case = case.name(), "collected final KPI values");
            results.push(row);
        }

        if results.is_empty() {
            info!(root = %root.display(), "no cases found");
            return Ok(BatchOutcome::NoCases);
        }
        Ok(BatchOutcome::Completed(results))
    }
}
