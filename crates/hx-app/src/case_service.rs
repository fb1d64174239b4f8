//! Per-case services: full-series plots and single-case inspection.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use hx_core::{Case, CaseParams, KpiRegistry};
use hx_results::CaseResult;
use tracing::{info, warn};

use crate::batch::discover_cases;
use crate::charts::{self, ChartReport, DashboardPanel};
use crate::error::{AppError, AppResult};
use crate::extract::{CaseKpiExtractor, CaseSeries, MissingMetric};
use crate::options::ExtractOptions;

pub const DASHBOARD_FILE: &str = "KPI_dashboard.svg";

/// Dashboard grid, row by row.
pub const DASHBOARD_LAYOUT: [&str; 6] = [
    "Tin_air",
    "Tout_air",
    "DeltaT_air",
    "DeltaP_air",
    "mdot_air_out",
    "Tout_porous",
];

pub struct PlotRequest<'a> {
    pub root: &'a Path,
    /// Folder created inside each case for its charts.
    pub results_dir_name: String,
    pub registry: Arc<KpiRegistry>,
    pub options: ExtractOptions,
}

#[derive(Debug)]
pub enum CasePlotStatus {
    /// The case has no `postProcessing/` folder.
    Skipped,
    Plotted {
        available: Vec<String>,
        missing: Vec<MissingMetric>,
        charts: ChartReport,
    },
}

#[derive(Debug)]
pub struct CasePlotReport {
    pub case: String,
    pub params: Option<CaseParams>,
    pub status: CasePlotStatus,
}

#[derive(Debug)]
pub enum PlotOutcome {
    NoCases,
    Plotted(Vec<CasePlotReport>),
}

pub fn plot_cases(request: &PlotRequest<'_>) -> AppResult<PlotOutcome> {
    let cases = discover_cases(request.root)?;
    if cases.is_empty() {
        return Ok(PlotOutcome::NoCases);
    }

    let extractor = CaseKpiExtractor::from_options(request.registry.clone(), &request.options)?;
    let mut reports = Vec::with_capacity(cases.len());
    for case in &cases {
        reports.push(plot_case(&extractor, case, &request.results_dir_name)?);
    }
    Ok(PlotOutcome::Plotted(reports))
}

/// Line chart per available series plus the dashboard for one case.
pub fn plot_case(
    extractor: &CaseKpiExtractor,
    case: &Case,
    results_dir_name: &str,
) -> AppResult<CasePlotReport> {
    if !case.post_processing_dir().is_dir() {
        warn!(case = case.name(), "no postProcessing folder, skipping");
        return Ok(CasePlotReport {
            case: case.name().to_string(),
            params: case.params(),
            status: CasePlotStatus::Skipped,
        });
    }

    let out_dir = case.root().join(results_dir_name);
    fs::create_dir_all(&out_dir)?;

    let series = extractor.extract_series(case)?;
    for missing in series.missing() {
        warn!(case = case.name(), metric = %missing.name, reason = %missing.reason, "series missing");
    }

    let registry = extractor.registry();
    let mut report = ChartReport::default();
    let mut available = Vec::new();
    for (name, data) in series.available() {
        let y_label = registry.label_of(name).unwrap_or(name);
        report.record(charts::line_chart(
            &out_dir.join(format!("{name}.svg")),
            &format!("{name} vs Iteration ({})", case.name()),
            y_label,
            data,
        ));
        available.push(name.to_string());
    }

    report.record(write_dashboard(
        registry,
        &series,
        &out_dir.join(DASHBOARD_FILE),
    ));
    info!(case = case.name(), charts = report.written.len(), "case plots written");

    Ok(CasePlotReport {
        case: case.name().to_string(),
        params: case.params(),
        status: CasePlotStatus::Plotted {
            available,
            missing: series.missing().to_vec(),
            charts: report,
        },
    })
}

fn write_dashboard(
    registry: &KpiRegistry,
    series: &CaseSeries,
    path: &Path,
) -> Result<PathBuf, charts::ReportError> {
    let panels: Vec<DashboardPanel<'_>> = DASHBOARD_LAYOUT
        .iter()
        .map(|&name| DashboardPanel {
            title: registry
                .derived_metric(name)
                .map(|d| d.title.as_str())
                .unwrap_or(name),
            y_label: registry.label_of(name).unwrap_or(name),
            series: series.get(name),
        })
        .collect();

    charts::dashboard(path, &format!("KPI Dashboard - {}", series.case), &panels)
}

/// Final values and their source files for a single case folder.
#[derive(Debug)]
pub struct CaseInspection {
    pub case: Case,
    /// Resolved file per registered KPI, in registry order.
    pub sources: Vec<(String, Option<PathBuf>)>,
    pub result: CaseResult,
}

pub fn inspect_case(
    case_dir: &Path,
    registry: Arc<KpiRegistry>,
    options: &ExtractOptions,
) -> AppResult<CaseInspection> {
    if !case_dir.is_dir() {
        return Err(AppError::InvalidInput(format!(
            "Not a case directory: {}",
            case_dir.display()
        )));
    }

    let case = Case::from_dir(case_dir);
    let extractor = CaseKpiExtractor::from_options(registry, options)?;

    let mut sources = Vec::new();
    for kpi in extractor.registry().kpis() {
        let file = extractor.source_file(case.root(), &kpi.name)?;
        sources.push((kpi.name.clone(), file));
    }
    let result = extractor.extract_final(&case)?;

    Ok(CaseInspection {
        case,
        sources,
        result,
    })
}
