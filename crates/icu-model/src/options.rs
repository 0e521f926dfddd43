//! Configuration options for the preparation pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Whether a run processes complete splits or a development sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunMode {
    /// All patient files; outcome tables pass through unchanged.
    #[default]
    Full,
    /// First `size` patient files per split; outcomes restricted to that cohort.
    Sample { size: usize },
}

impl RunMode {
    pub fn is_sample(&self) -> bool {
        matches!(self, RunMode::Sample { .. })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Full => "full",
            RunMode::Sample { .. } => "sample",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Full => write!(f, "full"),
            RunMode::Sample { size } => write!(f, "sample ({size} per split)"),
        }
    }
}

/// Lower bound of the hour range a patient table covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GapFillPolicy {
    /// Rows start at the earliest observed hour.
    #[default]
    FirstObservation,
    /// Rows start at hour 0 (admission).
    Admission,
}

impl GapFillPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            GapFillPolicy::FirstObservation => "first-observation",
            GapFillPolicy::Admission => "admission",
        }
    }
}

impl fmt::Display for GapFillPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GapFillPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_', ' '], "");
        match normalized.as_str() {
            "firstobservation" | "first" => Ok(GapFillPolicy::FirstObservation),
            "admission" | "zero" => Ok(GapFillPolicy::Admission),
            _ => Err(format!("Unknown gap-fill policy: {s}")),
        }
    }
}

/// What happens to a split when one of its patient files cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FileFailurePolicy {
    /// Record the failure and continue with the next file.
    #[default]
    Skip,
    /// Stop processing the split.
    Abort,
}

/// Parquet compression codec for written tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputCompression {
    #[default]
    Gzip,
    Zstd,
    Snappy,
    Uncompressed,
}

impl OutputCompression {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputCompression::Gzip => "gzip",
            OutputCompression::Zstd => "zstd",
            OutputCompression::Snappy => "snappy",
            OutputCompression::Uncompressed => "uncompressed",
        }
    }
}

impl fmt::Display for OutputCompression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OutputCompression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gzip" | "gz" => Ok(OutputCompression::Gzip),
            "zstd" => Ok(OutputCompression::Zstd),
            "snappy" => Ok(OutputCompression::Snappy),
            "uncompressed" | "none" => Ok(OutputCompression::Uncompressed),
            _ => Err(format!("Unknown compression: {s}")),
        }
    }
}

/// Highest hour bucket a patient table may cover by default.
pub const DEFAULT_MAX_HOUR: u32 = 10_000;

/// Options for reading a single patient file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyOptions {
    pub gap_fill: GapFillPolicy,
    /// Lines bucketed past this hour are rejected as format errors.
    pub max_hour: u32,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            gap_fill: GapFillPolicy::default(),
            max_hour: DEFAULT_MAX_HOUR,
        }
    }
}

/// Options controlling a preparation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrepareOptions {
    pub mode: RunMode,
    pub gap_fill: GapFillPolicy,
    pub file_failure: FileFailurePolicy,
    pub compression: OutputCompression,
    /// Build tables without writing outputs.
    pub dry_run: bool,
}

impl PrepareOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_gap_fill(mut self, gap_fill: GapFillPolicy) -> Self {
        self.gap_fill = gap_fill;
        self
    }

    pub fn with_file_failure(mut self, policy: FileFailurePolicy) -> Self {
        self.file_failure = policy;
        self
    }

    pub fn assembly(&self) -> AssemblyOptions {
        AssemblyOptions {
            gap_fill: self.gap_fill,
            ..AssemblyOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = PrepareOptions::default();
        assert_eq!(options.mode, RunMode::Full);
        assert_eq!(options.gap_fill, GapFillPolicy::FirstObservation);
        assert_eq!(options.file_failure, FileFailurePolicy::Skip);
        assert_eq!(options.compression, OutputCompression::Gzip);
        assert!(!options.dry_run);
    }

    #[test]
    fn gap_fill_from_str() {
        assert_eq!(
            "first_observation".parse::<GapFillPolicy>().unwrap(),
            GapFillPolicy::FirstObservation
        );
        assert_eq!(
            "Admission".parse::<GapFillPolicy>().unwrap(),
            GapFillPolicy::Admission
        );
        assert!("latest".parse::<GapFillPolicy>().is_err());
    }

    #[test]
    fn run_mode_display() {
        assert_eq!(RunMode::Full.to_string(), "full");
        assert_eq!(
            RunMode::Sample { size: 50 }.to_string(),
            "sample (50 per split)"
        );
        assert!(RunMode::Sample { size: 1 }.is_sample());
    }
}
