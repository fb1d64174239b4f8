//! Per-case KPI extraction.
//!
//! Final-value mode produces one [`CaseResult`] row; full-series mode
//! produces every usable series plus the derived ones. Missing data never
//! fails a case: it shows up as an absent value or a [`MissingMetric`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use hx_core::{Case, CaseParams, KpiRegistry};
use hx_results::CaseResult;
use hx_series::{
    FileOrdering, MIN_SERIES_POINTS, SeriesLocator, TimeSeries, diff_final, diff_series,
    read_last_value, read_series,
};
use tracing::debug;

use crate::error::AppResult;
use crate::options::ExtractOptions;

/// Why a metric has no usable series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingReason {
    NoFile,
    InsufficientPoints { found: usize },
    MissingOperands { minuend: String, subtrahend: String },
}

impl fmt::Display for MissingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingReason::NoFile => write!(f, "no series file found"),
            MissingReason::InsufficientPoints { found } => {
                write!(f, "not enough datapoints ({found})")
            }
            MissingReason::MissingOperands {
                minuend,
                subtrahend,
            } => write!(f, "{minuend} or {subtrahend} missing"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingMetric {
    pub name: String,
    pub reason: MissingReason,
}

/// Full series of one case, keyed by metric name.
#[derive(Debug, Clone)]
pub struct CaseSeries {
    pub case: String,
    pub params: Option<CaseParams>,
    series: BTreeMap<String, TimeSeries>,
    missing: Vec<MissingMetric>,
}

impl CaseSeries {
    pub fn get(&self, metric: &str) -> Option<&TimeSeries> {
        self.series.get(metric)
    }

    pub fn contains(&self, metric: &str) -> bool {
        self.series.contains_key(metric)
    }

    pub fn available(&self) -> impl Iterator<Item = (&str, &TimeSeries)> {
        self.series.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Metrics left out, in registry order.
    pub fn missing(&self) -> &[MissingMetric] {
        &self.missing
    }
}

#[derive(Debug, Clone)]
pub struct CaseKpiExtractor {
    registry: Arc<KpiRegistry>,
    locator: SeriesLocator,
}

impl CaseKpiExtractor {
    pub fn new(registry: Arc<KpiRegistry>) -> AppResult<Self> {
        registry.validate()?;
        let locator = SeriesLocator::new(registry.clone());
        Ok(Self { registry, locator })
    }

    pub fn from_options(registry: Arc<KpiRegistry>, options: &ExtractOptions) -> AppResult<Self> {
        Ok(Self::new(registry)?
            .with_ordering(options.ordering.to_file_ordering())
            .with_extension(&options.extension))
    }

    pub fn with_ordering(mut self, ordering: Arc<dyn FileOrdering>) -> Self {
        self.locator = self.locator.with_ordering(ordering);
        self
    }

    pub fn with_extension(mut self, extension: &str) -> Self {
        self.locator = self.locator.with_extension(extension);
        self
    }

    pub fn registry(&self) -> &KpiRegistry {
        &self.registry
    }

    /// Resolved source file for `kpi`, if any.
    pub fn source_file(&self, case_root: &Path, kpi: &str) -> AppResult<Option<PathBuf>> {
        Ok(self.locator.locate(case_root, kpi)?)
    }

    /// Final value of one KPI, or `None` when there is no data.
    pub fn final_value(&self, case_root: &Path, kpi: &str) -> AppResult<Option<f64>> {
        match self.locator.locate(case_root, kpi)? {
            Some(path) => Ok(read_last_value(&path)?),
            None => Ok(None),
        }
    }

    /// One summary row: every registered KPI and derived metric.
    pub fn extract_final(&self, case: &Case) -> AppResult<CaseResult> {
        debug!(case = case.name(), "extracting final values");
        let mut row = CaseResult::new(case.name(), case.params());

        for kpi in self.registry.kpis() {
            let value = self.final_value(case.root(), &kpi.name)?;
            if value.is_none() {
                debug!(case = case.name(), kpi = %kpi.name, "final value missing");
            }
            row.set(&kpi.name, value);
        }

        for metric in self.registry.derived() {
            let value = diff_final(row.get(&metric.minuend), row.get(&metric.subtrahend));
            row.set(&metric.name, value);
        }

        Ok(row)
    }

    /// Every usable series plus the derived ones.
    ///
    /// A series with fewer than two points is treated as missing.
    pub fn extract_series(&self, case: &Case) -> AppResult<CaseSeries> {
        debug!(case = case.name(), "extracting series");
        let mut series = BTreeMap::new();
        let mut missing = Vec::new();

        for kpi in self.registry.kpis() {
            let Some(path) = self.locator.locate(case.root(), &kpi.name)? else {
                missing.push(MissingMetric {
                    name: kpi.name.clone(),
                    reason: MissingReason::NoFile,
                });
                continue;
            };

            let data = read_series(&path)?;
            if data.len() < MIN_SERIES_POINTS {
                missing.push(MissingMetric {
                    name: kpi.name.clone(),
                    reason: MissingReason::InsufficientPoints { found: data.len() },
                });
                continue;
            }
            series.insert(kpi.name.clone(), data);
        }

        let mut derived = Vec::new();
        for metric in self.registry.derived() {
            match diff_series(series.get(&metric.minuend), series.get(&metric.subtrahend)) {
                Some(data) => derived.push((metric.name.clone(), data)),
                None => missing.push(MissingMetric {
                    name: metric.name.clone(),
                    reason: MissingReason::MissingOperands {
                        minuend: metric.minuend.clone(),
                        subtrahend: metric.subtrahend.clone(),
                    },
                }),
            }
        }
        series.extend(derived);

        Ok(CaseSeries {
            case: case.name().to_string(),
            params: case.params(),
            series,
            missing,
        })
    }
}
