//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the "real main" that:
//! - parses CLI arguments (with `.env` defaults)
//! - builds dashboards and writes HTML/SVG output
//! - runs one-off aggregations and the consumption calculator
//! - writes optional exports

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::info;

use crate::cli::{AggregateArgs, CalcArgs, Command, ConfigArgs, DashboardArgs};
use crate::config::{DashboardConfig, ENV_DATA_ROOT, ENV_OUT_DIR};
use crate::domain::{ChartData, ChartSpec};
use crate::error::AppError;
use crate::io::fetch::{DataRoot, SourceFetcher};
use crate::render::svg::file_stem;
use crate::render::{ChartJsRenderer, SurfaceRegistry, SvgRenderer, write_dashboard_html};
use crate::report::DashboardOutputs;

pub mod pipeline;

const DEFAULT_OUT_DIR: &str = "dashboard";
const DASHBOARD_TITLE: &str = "Dashboard de Energías Renovables";

/// Entry point for the `energy` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is the normal case.
    dotenvy::dotenv().ok();

    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Dashboard(args) => handle_dashboard(args),
        Command::Aggregate(args) => handle_aggregate(args),
        Command::Calc(args) => handle_calc(args),
        Command::Config(args) => handle_config(args),
    }
}

fn handle_dashboard(args: DashboardArgs) -> Result<(), AppError> {
    let config = load_config(args.config.as_deref())?;
    let root = resolve_data_root(args.data_root.as_deref(), env_var(ENV_DATA_ROOT), &config.data_root);
    let out_dir = resolve_out_dir(args.out.clone(), env_var(ENV_OUT_DIR));
    create_dir(&out_dir)?;

    let fetcher = SourceFetcher::new(DataRoot::parse(&root)?)?;
    info!("Data root: {:?}", fetcher.root());
    let charts = pipeline::build_dashboard(&fetcher, &config);
    let mut outputs = DashboardOutputs::default();

    if args.format.html() {
        let registry = SurfaceRegistry::new();
        pipeline::render_specs(&charts, &ChartJsRenderer, &registry)?;

        // Page order follows the configuration, not completion order.
        let rendered: Vec<_> = charts
            .iter()
            .filter_map(|chart| registry.get(&chart.surface))
            .collect();
        let path = out_dir.join("index.html");
        write_dashboard_html(&path, DASHBOARD_TITLE, &rendered)?;
        outputs.html = Some(path);
    }

    if args.format.svg() {
        let renderer = SvgRenderer::new(&out_dir).with_size(args.width, args.height);
        let registry = SurfaceRegistry::new();
        pipeline::render_specs(&charts, &renderer, &registry)?;
        outputs.svgs = charts
            .iter()
            .filter_map(|chart| registry.get(&chart.surface))
            .map(|handle| handle.path)
            .collect();
    }

    if let Some(dir) = &args.export_data {
        outputs.exports = export_charts(dir, &charts)?;
    }

    println!("{}", crate::report::format_dashboard_summary(&charts, &outputs));
    Ok(())
}

fn handle_aggregate(args: AggregateArgs) -> Result<(), AppError> {
    let filter = args.filter()?;
    let root = args
        .data_root
        .clone()
        .or_else(|| env_var(ENV_DATA_ROOT))
        .unwrap_or_else(|| ".".to_string());
    let fetcher = SourceFetcher::new(DataRoot::parse(&root)?)?;

    let report = crate::data::load_aggregate(&fetcher, &args.file, &filter)
        .map_err(|e| AppError::new(2, format!("Failed to load '{}': {e}", args.file)))?;

    if args.json {
        let json = serde_json::to_string_pretty(&report.aggregate)
            .map_err(|e| AppError::new(4, format!("Failed to encode aggregate: {e}")))?;
        println!("{json}");
    } else {
        println!("{}", crate::report::format_aggregate_report(&args.file, &filter, &report));
    }

    if let Some(path) = &args.export_csv {
        crate::io::export::write_aggregate_csv(path, &report.aggregate)?;
    }
    if let Some(path) = &args.export_json {
        crate::io::export::write_json(path, &report.aggregate)?;
    }

    Ok(())
}

fn handle_calc(args: CalcArgs) -> Result<(), AppError> {
    println!("{}", crate::calc::percentage_from_input(&args.consumption));
    Ok(())
}

fn handle_config(args: ConfigArgs) -> Result<(), AppError> {
    let config = load_config(args.config.as_deref())?;
    println!("{}", crate::config::dashboard_to_json(&config)?);
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<DashboardConfig, AppError> {
    match path {
        Some(path) => crate::config::read_dashboard(path),
        None => Ok(crate::config::builtin_dashboard()),
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Flag, then environment, then the configuration's own root.
fn resolve_data_root(flag: Option<&str>, env: Option<String>, configured: &str) -> String {
    flag.map(str::to_string)
        .or(env)
        .unwrap_or_else(|| configured.to_string())
}

fn resolve_out_dir(flag: Option<PathBuf>, env: Option<String>) -> PathBuf {
    flag.or_else(|| env.map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR))
}

fn create_dir(dir: &Path) -> Result<(), AppError> {
    fs::create_dir_all(dir)
        .map_err(|e| AppError::new(4, format!("Failed to create output directory '{}': {e}", dir.display())))
}

/// One CSV per chart plus `dashboard.json` holding every spec.
fn export_charts(dir: &Path, charts: &[ChartSpec]) -> Result<Vec<PathBuf>, AppError> {
    create_dir(dir)?;
    let mut written = Vec::with_capacity(charts.len() + 1);

    for chart in charts {
        let path = dir.join(format!("{}.csv", file_stem(&chart.surface)));
        match &chart.data {
            ChartData::Series(combined) => crate::io::export::write_combined_csv(&path, combined)?,
            ChartData::Pie(pie) => crate::io::export::write_pie_csv(&path, pie)?,
        }
        written.push(path);
    }

    let path = dir.join("dashboard.json");
    crate::io::export::write_json(&path, charts)?;
    written.push(path);

    Ok(written)
}

/// Rewrite argv so `energy` defaults to `energy dashboard`.
///
/// Rules:
/// - `energy`                          -> `energy dashboard`
/// - `energy --out site ...`           -> `energy dashboard --out site ...`
/// - `energy --help/--version/-h`      -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("dashboard".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "dashboard" | "aggregate" | "calc" | "config");
    if is_subcommand {
        return argv;
    }

    // A leading flag belongs to the default subcommand.
    if arg1.starts_with('-') {
        argv.insert(1, "dashboard".to_string());
        return argv;
    }

    argv
}
