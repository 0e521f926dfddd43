//! Type-safe enumerations for the variable catalog.
//!
//! The raw patient files only carry variable names as text. These enums give
//! every name a category and a scalar type so that the rest of the workspace
//! never has to re-derive them from membership tests.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a variable in the long-format table.
///
/// - **Key**: identifies a row (`RecordID`, `Hour`)
/// - **Static**: constant for the whole stay (`Age`, `Gender`, ...)
/// - **TimeSeries**: measured repeatedly, one cell per hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableCategory {
    Key,
    Static,
    TimeSeries,
}

impl VariableCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableCategory::Key => "Key",
            VariableCategory::Static => "Static",
            VariableCategory::TimeSeries => "Time series",
        }
    }

    /// Column ordering used by every table: keys, then statics, then series.
    pub fn sort_order(&self) -> u8 {
        match self {
            VariableCategory::Key => 1,
            VariableCategory::Static => 2,
            VariableCategory::TimeSeries => 3,
        }
    }
}

impl fmt::Display for VariableCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VariableCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['-', '_', ' '], "");
        match normalized.as_str() {
            "KEY" => Ok(VariableCategory::Key),
            "STATIC" => Ok(VariableCategory::Static),
            "TIMESERIES" => Ok(VariableCategory::TimeSeries),
            _ => Err(format!("Unknown variable category: {s}")),
        }
    }
}

/// Declared scalar type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    String,
    Integer,
    /// Text values stored as codes into a level list.
    Categorical,
    Float,
}

impl ScalarType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarType::String => "string",
            ScalarType::Integer => "integer",
            ScalarType::Categorical => "categorical",
            ScalarType::Float => "float",
        }
    }

    /// Returns true for the types whose raw text must parse as a number.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ScalarType::Integer | ScalarType::Float)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ScalarType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "string" | "str" | "text" => Ok(ScalarType::String),
            "integer" | "int" => Ok(ScalarType::Integer),
            "categorical" | "category" => Ok(ScalarType::Categorical),
            "float" | "double" => Ok(ScalarType::Float),
            _ => Err(format!("Unknown scalar type: {s}")),
        }
    }
}
