//! CLI argument definitions for the ICU preparation tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use icu_model::{GapFillPolicy, OutputCompression, Split};

#[derive(Parser)]
#[command(
    name = "icu-prep",
    version,
    about = "Prepare PhysioNet 2012 ICU records as hourly Parquet tables",
    long_about = "Convert per-patient ICU time-series files into one hourly long-format\n\
                  table per split, matched with the outcome table of the split.\n\n\
                  Expects <RAW_ROOT>/set-a, set-b, set-c and Outcomes-a/b/c.txt."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Build hourly cohort tables and matched outcome tables.
    Prepare(PrepareArgs),

    /// Only build the development sample directories (set-a-test, ...).
    Sample(SampleArgs),

    /// Summarize a prepared cohort table.
    Explore(ExploreArgs),

    /// List the variable catalog.
    Variables,
}

#[derive(Parser)]
pub struct PrepareArgs {
    /// Folder containing the set-* directories and Outcomes-*.txt files.
    #[arg(value_name = "RAW_ROOT")]
    pub raw_root: PathBuf,

    /// Output directory for Parquet tables (default: <RAW_ROOT>/data).
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Development mode: sample the first N patient files of each split and
    /// keep only their outcome rows.
    #[arg(long = "sample", value_name = "N")]
    pub sample: Option<usize>,

    /// Split to process (repeatable; default: all three).
    #[arg(long = "split", value_enum)]
    pub splits: Vec<SplitArg>,

    /// Parquet compression codec.
    #[arg(long = "compression", value_enum, default_value = "gzip")]
    pub compression: CompressionArg,

    /// First hour of each patient table.
    #[arg(long = "gap-fill", value_enum, default_value = "first-observation")]
    pub gap_fill: GapFillArg,

    /// Stop a split at its first unreadable patient file.
    #[arg(long = "abort-on-unreadable")]
    pub abort_on_unreadable: bool,

    /// Build and summarize tables without writing any files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct SampleArgs {
    #[arg(value_name = "RAW_ROOT")]
    pub raw_root: PathBuf,

    /// Number of patient files to copy per split.
    #[arg(long = "size", value_name = "N")]
    pub size: usize,

    /// Split to sample (repeatable; default: all three).
    #[arg(long = "split", value_enum)]
    pub splits: Vec<SplitArg>,
}

#[derive(Parser)]
pub struct ExploreArgs {
    /// Directory holding the prepared set-*.parquet.gzip tables.
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    #[arg(long = "split", value_enum, default_value = "a")]
    pub split: SplitArg,

    /// Write the hour-by-hour missingness frame to this Parquet file.
    #[arg(long = "missingness-out", value_name = "PATH")]
    pub missingness_out: Option<PathBuf>,

    /// Print the median-centred hourly spread of one variable.
    #[arg(long = "spread", value_name = "VARIABLE")]
    pub spread: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SplitArg {
    A,
    B,
    C,
}

impl From<SplitArg> for Split {
    fn from(arg: SplitArg) -> Self {
        match arg {
            SplitArg::A => Split::Training,
            SplitArg::B => Split::Validation,
            SplitArg::C => Split::Testing,
        }
    }
}

/// Requested splits, or all of them when none were named.
pub fn selected_splits(args: &[SplitArg]) -> Vec<Split> {
    if args.is_empty() {
        return Split::ALL.to_vec();
    }
    let mut splits: Vec<Split> = args.iter().map(|arg| Split::from(*arg)).collect();
    splits.sort();
    splits.dedup();
    splits
}

#[derive(Clone, Copy, ValueEnum)]
pub enum CompressionArg {
    Gzip,
    Zstd,
    Snappy,
    Uncompressed,
}

impl From<CompressionArg> for OutputCompression {
    fn from(arg: CompressionArg) -> Self {
        match arg {
            CompressionArg::Gzip => OutputCompression::Gzip,
            CompressionArg::Zstd => OutputCompression::Zstd,
            CompressionArg::Snappy => OutputCompression::Snappy,
            CompressionArg::Uncompressed => OutputCompression::Uncompressed,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum GapFillArg {
    FirstObservation,
    Admission,
}

impl From<GapFillArg> for GapFillPolicy {
    fn from(arg: GapFillArg) -> Self {
        match arg {
            GapFillArg::FirstObservation => GapFillPolicy::FirstObservation,
            GapFillArg::Admission => GapFillPolicy::Admission,
        }
    }
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
