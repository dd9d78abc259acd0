//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and installs logging
//! - parses CLI arguments into config structs
//! - runs collection and/or evaluation
//! - prints the summary and plot, and writes optional exports

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{CollectArgs, Command, DeriveArgs, EvaluateArgs, OutputArgs, RunArgs};
use crate::derive::Derived;
use crate::domain::{CollectConfig, ColumnSelector, DeriveConfig, OutputConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `prb` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Collect(args) => handle_collect(args),
        Command::Evaluate(args) => handle_evaluate(args),
        Command::Run(args) => handle_run(args),
    }
}

/// Formatted stderr logging filtered by `RUST_LOG` (default `info`).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    // A second init (e.g. from tests) is harmless; keep the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init();
}

fn handle_collect(args: CollectArgs) -> Result<(), AppError> {
    let config = collect_config_from_args(&args);
    let collected = pipeline::run_collect(&config, &args.output)?;
    println!("{}", crate::report::format_collect_report(&collected.report));
    Ok(())
}

fn handle_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let derive_config = derive_config_from_args(&args.derive);
    let output = output_config_from_args(&args.output);

    let derived = pipeline::run_evaluate_file(&args.input, &derive_config)?;
    present(&derived, &derive_config, &output)
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let collect_config = collect_config_from_args(&args.collect);
    let derive_config = derive_config_from_args(&args.derive);
    let output = output_config_from_args(&args.output);

    // Validate before touching the filesystem.
    derive_config.validate()?;

    let collected = pipeline::run_collect(&collect_config, &args.collect.output)?;
    println!("{}", crate::report::format_collect_report(&collected.report));

    let derived = pipeline::run_evaluate(collected.records, &derive_config)?;
    present(&derived, &derive_config, &output)
}

fn present(derived: &Derived, derive_config: &DeriveConfig, output: &OutputConfig) -> Result<(), AppError> {
    println!(
        "{}",
        crate::report::format_summary(&derived.enriched, &derived.summary, derive_config)
    );

    if output.plot {
        let plot = crate::plot::render_ascii_plot(&derived.enriched, output.plot_width, output.plot_height);
        println!("{plot}");
    }

    pipeline::write_outputs(derived, derive_config, output)
}

pub fn collect_config_from_args(args: &CollectArgs) -> CollectConfig {
    CollectConfig {
        root_path: args.root.clone(),
        pairing: args.pairing,
        pr_column: ColumnSelector::from_name(args.pr_column.as_deref()),
        ghi_column: ColumnSelector::from_name(args.ghi_column.as_deref()),
    }
}

pub fn derive_config_from_args(args: &DeriveArgs) -> DeriveConfig {
    DeriveConfig {
        start_date: args.start_date,
        end_date: args.end_date,
        window_size: args.window,
        epoch_year: args.epoch_year,
        base_budget: args.base_budget,
        yearly_drop: args.yearly_drop,
    }
}

pub fn output_config_from_args(args: &OutputArgs) -> OutputConfig {
    OutputConfig {
        export_enriched: args.export_enriched.clone(),
        export_summary: args.export_summary.clone(),
        chart: (!args.no_chart).then(|| args.chart.clone()),
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
    }
}
