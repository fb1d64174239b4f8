//! Cross-case comparison: summary CSV, manifest and global charts.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use hx_core::KpiRegistry;
use hx_results::{ResultSet, SummaryManifest, SummaryStore};
use tracing::info;

use crate::batch::{BatchAggregator, BatchOutcome};
use crate::charts::{self, ChartReport};
use crate::error::AppResult;
use crate::extract::CaseKpiExtractor;
use crate::options::ExtractOptions;

/// Metrics drawn as per-case bar charts.
pub const BAR_CHART_METRICS: [&str; 4] = ["Tout_air", "DeltaT_air", "DeltaP_air", "mdot_air_out"];

/// Trade-off scatter axes: (x, y).
pub const TRADEOFF_METRICS: (&str, &str) = ("DeltaP_air", "DeltaT_air");

pub struct CompareRequest<'a> {
    pub root: &'a Path,
    pub output_dir: PathBuf,
    pub registry: Arc<KpiRegistry>,
    pub options: ExtractOptions,
}

#[derive(Debug)]
pub struct CompareResponse {
    pub results: ResultSet,
    pub summary_path: PathBuf,
    pub manifest: SummaryManifest,
    pub charts: ChartReport,
}

#[derive(Debug)]
pub enum CompareOutcome {
    /// No case folders were found; nothing was written.
    NoCases,
    Written(CompareResponse),
}

pub fn run_compare(request: &CompareRequest<'_>) -> AppResult<CompareOutcome> {
    let extractor = CaseKpiExtractor::from_options(request.registry.clone(), &request.options)?;
    let aggregator = BatchAggregator::new(extractor);

    let results = match aggregator.run(request.root)? {
        BatchOutcome::NoCases => return Ok(CompareOutcome::NoCases),
        BatchOutcome::Completed(results) => results,
    };

    let store = SummaryStore::new(request.output_dir.clone())?;
    let manifest = SummaryManifest::for_result_set(&results, &request.root.display().to_string());
    let summary_path = store.save(&results, &manifest)?;
    info!(path = %summary_path.display(), cases = results.len(), "wrote KPI summary");

    let charts = write_global_charts(&results, &request.registry, store.root_dir());

    Ok(CompareOutcome::Written(CompareResponse {
        results,
        summary_path,
        manifest,
        charts,
    }))
}

/// Bar charts per metric and the DeltaT vs DeltaP trade-off scatter.
pub fn write_global_charts(results: &ResultSet, registry: &KpiRegistry, dir: &Path) -> ChartReport {
    let mut report = ChartReport::default();
    let labels = results.case_names();

    for metric in BAR_CHART_METRICS {
        let y_label = registry.label_of(metric).unwrap_or(metric);
        report.record(charts::bar_chart(
            &dir.join(format!("{metric}_final.svg")),
            &format!("{metric} (final) by case"),
            y_label,
            &labels,
            &results.column_values(metric),
        ));
    }

    let (x_metric, y_metric) = TRADEOFF_METRICS;
    let points = tradeoff_points(results, x_metric, y_metric);
    if !points.is_empty() {
        report.record(charts::scatter_chart(
            &dir.join("DeltaT_vs_DeltaP.svg"),
            &format!("Tradeoff: {y_metric} vs {x_metric} (final)"),
            registry.label_of(x_metric).unwrap_or(x_metric),
            registry.label_of(y_metric).unwrap_or(y_metric),
            &points,
        ));
    }

    report
}

/// Cases where both metrics are present, labelled by case name.
pub fn tradeoff_points(results: &ResultSet, x_metric: &str, y_metric: &str) -> Vec<(f64, f64, String)> {
    results
        .rows()
        .iter()
        .filter_map(|row| Some((row.get(x_metric)?, row.get(y_metric)?, row.case.clone())))
        .collect()
}
