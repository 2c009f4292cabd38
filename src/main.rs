//! CLI entry point for the generation company analyzer.
//!
//! Provides subcommands for running the full analysis, reconciling revenue,
//! extracting generation output history, describing financial fields and
//! listing the stations found under a year's subsidiaries.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use genco_analyzer::analyzers::analyzer::analyze;
use genco_analyzer::analyzers::extract::{field_series, generation_history};
use genco_analyzer::analyzers::reconcile::{is_consolidated, reconcile};
use genco_analyzer::analyzers::statistics::describe;
use genco_analyzer::analyzers::types::{AnalysisReport, DescribedSeries, YearSeries};
use genco_analyzer::{
    chart::render_line_chart,
    config::AnalysisConfig,
    loader::load_dataset,
    output::{print_json, print_pretty, write_json, write_series_csv},
    stations::stations,
};
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "genco_analyzer")]
#[command(about = "Financial and operational analysis of a generation company dataset", long_about = None)]
struct Cli {
    /// JSON analysis config; flags below override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every enabled analysis and write the report, CSV tables and charts
    Analyze {
        /// Dataset JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Directory to write results to
        #[arg(short, long, default_value = "output")]
        output_dir: PathBuf,

        /// Skip chart rendering
        #[arg(long, default_value_t = false)]
        no_charts: bool,

        /// Gzip compress written files
        #[arg(long, default_value_t = false)]
        gzip: bool,

        /// Years left out of the adjusted recognized-value statistics
        #[arg(long, value_delimiter = ',')]
        exclude_years: Option<Vec<i32>>,
    },
    /// Rebuild operating revenue from stations and compare with the reported figure
    Reconcile {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Minimum shareholding percentage for consolidation
        #[arg(short, long)]
        threshold: Option<f64>,
    },
    /// Extract generation output history per subsidiary
    Generation {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Only these subsidiaries (repeatable)
        #[arg(short, long)]
        subsidiary: Vec<String>,

        /// Apply the shareholding gate to the extraction
        #[arg(long, default_value_t = false)]
        gate: bool,

        /// Write the history as JSON to this file instead of logging it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Describe top-level financial fields
    Stats {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Fields to describe (repeatable); defaults to the configured set
        #[arg(short, long)]
        field: Vec<String>,
    },
    /// List the stations found under one year's subsidiaries
    Stations {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[arg(short, long)]
        year: i32,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/genco_analyzer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("genco_analyzer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let mut config = AnalysisConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            input,
            output_dir,
            no_charts,
            gzip,
            exclude_years,
        } => {
            if let Some(years) = exclude_years {
                config.valuation.excluded_years = years;
            }
            let dataset = load_dataset(&input)?;
            let report = analyze(&dataset, &config);
            write_report(&report, &output_dir, !no_charts, gzip)?;
        }
        Commands::Reconcile { input, threshold } => {
            let dataset = load_dataset(&input)?;
            let threshold = threshold.unwrap_or(config.reconcile.shareholding_threshold);
            let reconciliation = reconcile(&dataset, &config.fields, threshold);
            print_json(&reconciliation)?;
        }
        Commands::Generation {
            input,
            subsidiary,
            gate,
            output,
        } => {
            if !subsidiary.is_empty() {
                config.generation.subsidiaries = subsidiary;
            }
            config.generation.apply_shareholding_gate |= gate;

            let dataset = load_dataset(&input)?;
            let history = generation_history(&dataset, &config.fields, &config.generation);
            match output {
                Some(path) => {
                    let written = write_json(&path, &history, false)?;
                    info!(path = %written.display(), "Generation history saved");
                }
                None => print_json(&history)?,
            }
        }
        Commands::Stats { input, field } => {
            let fields = if field.is_empty() {
                config.financials.series.clone()
            } else {
                field
            };

            let dataset = load_dataset(&input)?;
            let described: BTreeMap<_, _> = fields
                .iter()
                .map(|f| (f.clone(), describe(&field_series(&dataset, f))))
                .collect();
            print_json(&described)?;
        }
        Commands::Stations { input, year } => {
            let dataset = load_dataset(&input)?;
            let record = dataset
                .years
                .get(&year)
                .with_context(|| format!("year {year} not in dataset"))?;
            let Some(subsidiaries) = record.subsidiaries(&config.fields.subsidiaries) else {
                warn!(year, "Year has no subsidiaries");
                return Ok(());
            };

            for (name, node) in subsidiaries.children() {
                let consolidated =
                    is_consolidated(node, &config.fields, config.reconcile.shareholding_threshold);
                for station in stations(name, node, &config.fields) {
                    info!(
                        subsidiary = name,
                        consolidated,
                        station = %station.name,
                        generation = ?station.generation,
                        unit_price = ?station.unit_price,
                        revenue = ?station.revenue(),
                        "Station"
                    );
                }
            }
        }
    }

    Ok(())
}

/// Writes the report JSON plus a CSV table and chart per series section.
#[tracing::instrument(skip_all, fields(output_dir = %output_dir.display(), charts, gzip))]
fn write_report(report: &AnalysisReport, output_dir: &Path, charts: bool, gzip: bool) -> Result<()> {
    print_pretty(report);
    let written = write_json(&output_dir.join("report.json"), report, gzip)?;
    info!(path = %written.display(), "Report saved");

    if let Some(section) = &report.generation_output {
        write_section(output_dir, "generation_output", "Generation output", section, charts, gzip)?;
    }

    if let Some(section) = &report.financials {
        write_section(output_dir, "financials", "Financial figures", section, charts, gzip)?;
    }

    if let Some(reconciliation) = &report.reconciliation {
        let mut series: BTreeMap<String, YearSeries> = BTreeMap::new();
        for (year, r) in reconciliation {
            series
                .entry("theoretical_operating_revenue".into())
                .or_default()
                .insert(*year, Some(r.theoretical_operating_revenue));
            series
                .entry("actual_operating_revenue".into())
                .or_default()
                .insert(*year, r.actual_operating_revenue);
        }
        write_series(output_dir, "reconciliation", "Operating revenue", &series, charts, gzip)?;
    }

    if let Some(valuation) = &report.valuation {
        let series = BTreeMap::from([(
            "recognized_value".to_string(),
            valuation.recognized.series.clone(),
        )]);
        write_series(output_dir, "recognized_value", "Recognized value", &series, charts, gzip)?;
    }

    Ok(())
}

fn write_section(
    output_dir: &Path,
    stem: &str,
    title: &str,
    section: &BTreeMap<String, DescribedSeries>,
    charts: bool,
    gzip: bool,
) -> Result<()> {
    write_series(output_dir, stem, title, &AnalysisReport::series(section), charts, gzip)
}

fn write_series(
    output_dir: &Path,
    stem: &str,
    title: &str,
    series: &BTreeMap<String, YearSeries>,
    charts: bool,
    gzip: bool,
) -> Result<()> {
    let written = write_series_csv(&output_dir.join(format!("{stem}.csv")), series, gzip)?;
    info!(path = %written.display(), "Series table saved");

    if charts {
        let chart_path = output_dir.join(format!("{stem}.svg"));
        if let Err(e) = render_line_chart(&chart_path, title, "", series) {
            warn!(chart = stem, error = %e, "Chart not rendered");
        }
    }

    Ok(())
}
