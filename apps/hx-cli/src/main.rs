use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hx_app::{
    AppError, AppResult, CasePlotStatus, CompareOutcome, CompareRequest, ExtractOptions,
    PlotOutcome, PlotRequest, TimestepOrdering, inspect_case, plot_cases, run_compare,
};
use hx_core::KpiRegistry;

#[derive(Parser)]
#[command(name = "hx-cli")]
#[command(about = "KPI extraction and comparison for heat-exchanger CFD sweeps", long_about = None)]
struct Cli {
    /// How the latest series file is picked among time directories
    #[arg(long, value_enum, global = true, default_value_t = OrderArg::Lexical)]
    timestep_order: OrderArg,

    /// Series file extension
    #[arg(long, global = true, default_value = "dat")]
    extension: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    Lexical,
    Numeric,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate final KPI values across all cases into a summary CSV
    Compare {
        /// Sweep directory holding the run_U*_Tp* folders
        #[arg(default_value = ".")]
        root: PathBuf,
        /// Output directory for the summary and charts
        #[arg(long, default_value = "results_global")]
        out: PathBuf,
    },
    /// Plot full KPI series for every case
    PlotCases {
        /// Sweep directory holding the run_U*_Tp* folders
        #[arg(default_value = ".")]
        root: PathBuf,
        /// Folder created inside each case for its charts
        #[arg(long, default_value = "results")]
        results_dir: String,
    },
    /// Show resolved series files and final values for one case
    ShowCase {
        /// Path to the case folder
        case_dir: PathBuf,
    },
    /// Print the KPI registry as YAML
    Registry,
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let options = ExtractOptions {
        ordering: match cli.timestep_order {
            OrderArg::Lexical => TimestepOrdering::Lexical,
            OrderArg::Numeric => TimestepOrdering::Numeric,
        },
        extension: cli.extension,
    };
    let registry = Arc::new(KpiRegistry::standard());

    match cli.command {
        Commands::Compare { root, out } => cmd_compare(&root, resolve_out(&root, out), registry, options),
        Commands::PlotCases { root, results_dir } => {
            cmd_plot_cases(&root, results_dir, registry, options)
        }
        Commands::ShowCase { case_dir } => cmd_show_case(&case_dir, registry, &options),
        Commands::Registry => cmd_registry(&registry),
    }
}

/// Relative output directories live under the sweep root.
fn resolve_out(root: &Path, out: PathBuf) -> PathBuf {
    if out.is_absolute() { out } else { root.join(out) }
}

fn cmd_compare(
    root: &Path,
    output_dir: PathBuf,
    registry: Arc<KpiRegistry>,
    options: ExtractOptions,
) -> AppResult<()> {
    info!(root = %root.display(), "comparing cases");
    let request = CompareRequest {
        root,
        output_dir,
        registry,
        options,
    };

    let response = match run_compare(&request)? {
        CompareOutcome::NoCases => {
            println!("No cases found like run_U*_Tp* in {}", root.display());
            return Ok(());
        }
        CompareOutcome::Written(response) => response,
    };

    println!("✓ Wrote: {}", response.summary_path.display());
    for chart in &response.charts.written {
        println!("✓ Wrote: {}", chart.display());
    }
    for failed in &response.charts.failed {
        println!("✗ {}", failed);
    }

    println!("\nCases: {}", response.manifest.case_count);
    for (column, count) in &response.manifest.missing {
        if *count > 0 {
            println!("  {column}: missing in {count} case(s)");
        }
    }
    Ok(())
}

fn cmd_plot_cases(
    root: &Path,
    results_dir_name: String,
    registry: Arc<KpiRegistry>,
    options: ExtractOptions,
) -> AppResult<()> {
    let request = PlotRequest {
        root,
        results_dir_name,
        registry,
        options,
    };

    let reports = match plot_cases(&request)? {
        PlotOutcome::NoCases => {
            println!("No cases found like run_U*_Tp* in {}", root.display());
            return Ok(());
        }
        PlotOutcome::Plotted(reports) => reports,
    };

    for report in reports {
        match report.status {
            CasePlotStatus::Skipped => {
                println!("- {}: no postProcessing folder, skipped", report.case);
            }
            CasePlotStatus::Plotted {
                available,
                missing,
                charts,
            } => {
                println!("\n=== {} ===", report.case);
                println!("  Available: {}", available.join(", "));
                for metric in &missing {
                    println!("  [MISS] {}: {}", metric.name, metric.reason);
                }
                for chart in &charts.written {
                    println!("✓ Wrote: {}", chart.display());
                }
                for failed in &charts.failed {
                    println!("✗ {}", failed);
                }
            }
        }
    }
    Ok(())
}

fn cmd_show_case(
    case_dir: &Path,
    registry: Arc<KpiRegistry>,
    options: &ExtractOptions,
) -> AppResult<()> {
    let inspection = inspect_case(case_dir, registry.clone(), options)?;

    println!("Case: {}", inspection.case.name());
    match inspection.case.params() {
        Some(params) => println!(
            "  U_air = {}, Tpor_in = {}",
            params.velocity, params.porous_temperature
        ),
        None => println!("  (no sweep parameters in name)"),
    }

    println!("\nSources:");
    for (kpi, source) in &inspection.sources {
        match source {
            Some(path) => println!("  {:<14} {}", kpi, path.display()),
            None => println!("  {:<14} (not found)", kpi),
        }
    }

    println!("\nFinal values:");
    for column in registry.columns() {
        match inspection.result.get(column) {
            Some(value) => println!("  {:<14} {}", column, value),
            None => println!("  {:<14} -", column),
        }
    }
    Ok(())
}

fn cmd_registry(registry: &KpiRegistry) -> AppResult<()> {
    let yaml =
        serde_yaml::to_string(registry).map_err(|e| AppError::Serialization(e.to_string()))?;
    print!("{yaml}");
    Ok(())
}
