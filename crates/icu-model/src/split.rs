//! Dataset splits and the file names derived from them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// One of the three PhysioNet 2012 partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Split {
    Training,
    Validation,
    Testing,
}

impl Split {
    pub const ALL: [Split; 3] = [Split::Training, Split::Validation, Split::Testing];

    /// Single-letter key used in every file and directory name.
    pub fn key(&self) -> &'static str {
        match self {
            Split::Training => "a",
            Split::Validation => "b",
            Split::Testing => "c",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "a" => Some(Split::Training),
            "b" => Some(Split::Validation),
            "c" => Some(Split::Testing),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Training => "training",
            Split::Validation => "validation",
            Split::Testing => "testing",
        }
    }

    /// Raw directory name, e.g. `set-a`.
    pub fn dir_name(&self) -> String {
        format!("set-{}", self.key())
    }

    /// Development sample directory name, e.g. `set-a-test`.
    pub fn sample_dir_name(&self) -> String {
        format!("set-{}-test", self.key())
    }

    /// Outcome file name, e.g. `Outcomes-a.txt`.
    pub fn outcome_file_name(&self) -> String {
        format!("Outcomes-{}.txt", self.key())
    }

    pub fn table_file_name(&self) -> String {
        format!("set-{}.parquet.gzip", self.key())
    }

    pub fn outcomes_table_file_name(&self) -> String {
        format!("set-{}-outcomes.parquet.gzip", self.key())
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "set-{}", self.key())
    }
}

impl FromStr for Split {
    type Err = ModelError;

    /// Accepts a key (`a`), a directory name (`set-a`) or a split name (`training`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lowered = trimmed.to_ascii_lowercase();
        let key = lowered.strip_prefix("set-").unwrap_or(&lowered);
        if let Some(split) = Split::from_key(key) {
            return Ok(split);
        }
        match key {
            "training" | "train" => Ok(Split::Training),
            "validation" => Ok(Split::Validation),
            "testing" | "test" => Ok(Split::Testing),
            _ => Err(ModelError::UnknownSplit(trimmed.to_string())),
        }
    }
}
