//! Command-line parsing for the PR evaluation tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the collection and derivation code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::PairingMode;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "prb", version, about = "Solar PR vs. budget evaluation from PR/GHI telemetry")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Merge the PR and GHI trees into one `Date,GHI,PR` CSV.
    Collect(CollectArgs),
    /// Evaluate a merged CSV: rolling average, budget line, summary, chart.
    Evaluate(EvaluateArgs),
    /// Collect, write the merged CSV, then evaluate it.
    Run(RunArgs),
}

/// Options for walking the data tree.
#[derive(Debug, Args, Clone)]
pub struct CollectArgs {
    /// Data root containing `PR/` and `GHI/`.
    #[arg(long, env = "PRB_ROOT", value_name = "DIR")]
    pub root: PathBuf,

    /// Merged CSV to write.
    #[arg(short, long, env = "PRB_OUTPUT", value_name = "CSV")]
    pub output: PathBuf,

    /// How rows of a PR/GHI file pair are matched.
    #[arg(long, value_enum, default_value_t = PairingMode::Strict)]
    pub pairing: PairingMode,

    /// Header of the PR value column (default: first numeric column).
    #[arg(long, value_name = "NAME")]
    pub pr_column: Option<String>,

    /// Header of the GHI value column (default: first numeric column).
    #[arg(long, value_name = "NAME")]
    pub ghi_column: Option<String>,
}

/// Derivation parameters.
#[derive(Debug, Args, Clone)]
pub struct DeriveArgs {
    /// Drop records before this date (inclusive bound).
    #[arg(long, value_parser = parse_date_arg, value_name = "YYYY-MM-DD")]
    pub start_date: Option<NaiveDate>,

    /// Drop records after this date (inclusive bound).
    #[arg(long, value_parser = parse_date_arg, value_name = "YYYY-MM-DD")]
    pub end_date: Option<NaiveDate>,

    /// Trailing window (records) for the PR moving average.
    #[arg(long, default_value_t = 30)]
    pub window: usize,

    /// Calendar year whose July starts fiscal year 0.
    #[arg(long, default_value_t = 2019)]
    pub epoch_year: i32,

    /// Budget PR in fiscal year 0.
    #[arg(long, default_value_t = 73.9, allow_negative_numbers = true)]
    pub base_budget: f64,

    /// Budget PR reduction per fiscal year.
    #[arg(long, default_value_t = 0.8, allow_negative_numbers = true)]
    pub yearly_drop: f64,
}

/// Where evaluation results go.
#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    /// Export the enriched per-day sequence to CSV.
    #[arg(long, value_name = "CSV")]
    pub export_enriched: Option<PathBuf>,

    /// Export the summary statistics to JSON.
    #[arg(long, value_name = "JSON")]
    pub export_summary: Option<PathBuf>,

    /// SVG chart output.
    #[arg(long, value_name = "SVG", default_value = "Performance-Ratio-Evaluation.svg")]
    pub chart: PathBuf,

    /// Do not write the SVG chart.
    #[arg(long)]
    pub no_chart: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct EvaluateArgs {
    /// Merged `Date,GHI,PR` CSV produced by `prb collect`.
    #[arg(short, long, env = "PRB_INPUT", value_name = "CSV")]
    pub input: PathBuf,

    #[command(flatten)]
    pub derive: DeriveArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub collect: CollectArgs,

    #[command(flatten)]
    pub derive: DeriveArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    crate::io::ingest::parse_date(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_defaults_match_reference_deployment() {
        let cli = Cli::try_parse_from(["prb", "run", "--root", "data", "--output", "merged.csv"]).unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.collect.pairing, PairingMode::Strict);
        assert_eq!(args.derive.window, 30);
        assert_eq!(args.derive.epoch_year, 2019);
        assert_eq!(args.derive.base_budget, 73.9);
        assert_eq!(args.derive.yearly_drop, 0.8);
        assert_eq!(args.output.chart, PathBuf::from("Performance-Ratio-Evaluation.svg"));
        assert!(args.derive.start_date.is_none());
    }

    #[test]
    fn evaluate_parses_date_bounds() {
        let cli = Cli::try_parse_from([
            "prb",
            "evaluate",
            "--input",
            "merged.csv",
            "--start-date",
            "2023-01-01",
            "--end-date",
            "31/12/2023",
            "--pairing",
        ]);
        // `--pairing` is a collect option.
        assert!(cli.is_err());

        let cli = Cli::try_parse_from([
            "prb",
            "evaluate",
            "--input",
            "merged.csv",
            "--start-date",
            "2023-01-01",
            "--end-date",
            "31/12/2023",
        ])
        .unwrap();
        let Command::Evaluate(args) = cli.command else {
            panic!("expected evaluate");
        };
        assert_eq!(args.derive.start_date, NaiveDate::from_ymd_opt(2023, 1, 1));
        assert_eq!(args.derive.end_date, NaiveDate::from_ymd_opt(2023, 12, 31));
    }

    #[test]
    fn invalid_date_is_rejected() {
        let res = Cli::try_parse_from(["prb", "evaluate", "--input", "m.csv", "--start-date", "soon"]);
        assert!(res.is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
