//! Line- and value-level problems found while reading patient files.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IssueKind {
    /// Line skipped: wrong field count, bad encoding or malformed timestamp.
    Format,
    /// Value could not be coerced to its column type; the cell stays unset.
    ValueConversion,
    /// Variable name outside the catalog; the value is dropped.
    UnknownVariable,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::Format => "format",
            IssueKind::ValueConversion => "value-conversion",
            IssueKind::UnknownVariable => "unknown-variable",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A problem attached to one line of a patient file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineIssue {
    /// 1-based line number, header included.
    pub line: u64,
    pub kind: IssueKind,
    pub variable: Option<String>,
    pub value: Option<String>,
    pub message: String,
}

/// Issue totals by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IssueCounts {
    pub format: usize,
    pub value_conversion: usize,
    pub unknown_variable: usize,
}

impl IssueCounts {
    pub fn from_issues(issues: &[LineIssue]) -> Self {
        let mut counts = Self::default();
        for issue in issues {
            counts.record(issue.kind);
        }
        counts
    }

    pub fn record(&mut self, kind: IssueKind) {
        match kind {
            IssueKind::Format => self.format += 1,
            IssueKind::ValueConversion => self.value_conversion += 1,
            IssueKind::UnknownVariable => self.unknown_variable += 1,
        }
    }

    pub fn merge(&mut self, other: IssueCounts) {
        self.format += other.format;
        self.value_conversion += other.value_conversion;
        self.unknown_variable += other.unknown_variable;
    }

    pub fn total(&self) -> usize {
        self.format + self.value_conversion + self.unknown_variable
    }
}
