//! CLI argument definitions for the hospital data cleaner.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "hdq",
    version,
    about = "Hospital Data Quality - clean, validate and score hospital datasets",
    long_about = "Clean a hospital dataset of patients and appointments.\n\n\
                  Corrects malformed dates with dataset-level format inference,\n\
                  validates schemas and referential integrity, and writes cleaned\n\
                  CSVs plus a JSON quality report."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow row-level patient data in trace logs.
    ///
    /// Off by default: cell values are replaced with a redaction token so
    /// logs stay free of personal data.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Clean a dataset folder and write corrected outputs plus the report.
    Clean(CleanArgs),

    /// Show the expected table schemas.
    Schemas,
}

#[derive(Parser)]
pub struct CleanArgs {
    /// Folder containing patients.csv and appointments.csv.
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    /// Output directory for cleaned files (default: <DATA_DIR>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Validate and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Evidence fraction a day/month order needs before an ambiguous date
    /// is trusted at face value.
    #[arg(long = "majority-threshold", value_name = "FRACTION", default_value_t = 0.6)]
    pub majority_threshold: f64,

    /// Pivot for two-digit years: values above it land in the previous
    /// century (default: derived from the current year).
    #[arg(long = "year-pivot", value_name = "YY")]
    pub year_pivot: Option<i32>,

    /// Appointment dates further ahead than this are flagged.
    #[arg(long = "future-horizon-days", value_name = "DAYS", default_value_t = 730)]
    pub future_horizon_days: i64,

    /// Override a table's required fields, as TABLE.FIELD (repeatable).
    ///
    /// All overrides for a table together replace its built-in required
    /// set; tables without an override keep the defaults.
    #[arg(long = "require", value_name = "TABLE.FIELD")]
    pub require: Vec<String>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
