//! Variable catalog for the PhysioNet 2012 ICU records.
//!
//! The catalog is the single source of truth for which names exist, which
//! category they belong to and how their values are typed. It is built once
//! per process and never mutated; use [`schema_registry`] to access it.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Serialize;

use crate::enums::{ScalarType, VariableCategory};

/// Name of the patient identifier column (and of the raw token carrying it).
pub const RECORD_ID: &str = "RecordID";

/// Name of the hour-bucket column.
pub const HOUR: &str = "Hour";

pub const KEY_VARIABLES: [&str; 2] = [RECORD_ID, HOUR];

pub const STATIC_VARIABLES: [&str; 4] = ["Age", "Gender", "Height", "Weight"];

pub const TIME_SERIES_VARIABLES: [&str; 37] = [
    "ALP",
    "ALT",
    "AST",
    "Albumin",
    "BUN",
    "Bilirubin",
    "Cholesterol",
    "Creatinine",
    "DiasABP",
    "FiO2",
    "GCS",
    "Glucose",
    "HCO3",
    "HCT",
    "HR",
    "ICUType",
    "K",
    "Lactate",
    "MAP",
    "MechVent",
    "Mg",
    "NIDiasABP",
    "NIMAP",
    "NISysABP",
    "Na",
    "PaCO2",
    "PaO2",
    "Platelets",
    "RespRate",
    "SaO2",
    "SysABP",
    "Temp",
    "TroponinI",
    "TroponinT",
    "Urine",
    "WBC",
    "pH",
];

/// A catalogued variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Variable {
    pub name: &'static str,
    pub category: VariableCategory,
    pub scalar_type: ScalarType,
}

/// How a raw variable token from a patient file is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The patient identifier token.
    RecordId,
    /// Index into [`SchemaRegistry::static_variables`].
    Static(usize),
    /// Index into [`SchemaRegistry::time_series_variables`].
    TimeSeries(usize),
    /// A key other than `RecordID`, or a name outside the catalog.
    Unknown,
}

/// Read-only lookup over the variable catalog.
#[derive(Debug)]
pub struct SchemaRegistry {
    variables: Vec<Variable>,
    by_name: HashMap<&'static str, usize>,
    static_index: HashMap<&'static str, usize>,
    series_index: HashMap<&'static str, usize>,
}

impl SchemaRegistry {
    /// Same as [`schema_registry`].
    pub fn global() -> &'static SchemaRegistry {
        schema_registry()
    }

    fn build() -> Self {
        let mut variables = Vec::with_capacity(
            KEY_VARIABLES.len() + STATIC_VARIABLES.len() + TIME_SERIES_VARIABLES.len(),
        );
        variables.push(Variable {
            name: RECORD_ID,
            category: VariableCategory::Key,
            scalar_type: ScalarType::String,
        });
        variables.push(Variable {
            name: HOUR,
            category: VariableCategory::Key,
            scalar_type: ScalarType::Integer,
        });
        for name in STATIC_VARIABLES {
            let scalar_type = if name == "Gender" {
                ScalarType::Categorical
            } else {
                ScalarType::Float
            };
            variables.push(Variable {
                name,
                category: VariableCategory::Static,
                scalar_type,
            });
        }
        for name in TIME_SERIES_VARIABLES {
            variables.push(Variable {
                name,
                category: VariableCategory::TimeSeries,
                scalar_type: ScalarType::Float,
            });
        }
        let by_name = variables
            .iter()
            .enumerate()
            .map(|(idx, variable)| (variable.name, idx))
            .collect();
        let static_index = STATIC_VARIABLES
            .iter()
            .enumerate()
            .map(|(idx, name)| (*name, idx))
            .collect();
        let series_index = TIME_SERIES_VARIABLES
            .iter()
            .enumerate()
            .map(|(idx, name)| (*name, idx))
            .collect();
        Self {
            variables,
            by_name,
            static_index,
            series_index,
        }
    }

    /// All variables in canonical column order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.variables.iter().map(|v| v.name).collect()
    }

    pub fn lookup(&self, name: &str) -> Option<&Variable> {
        self.by_name.get(name).map(|idx| &self.variables[*idx])
    }

    pub fn category(&self, name: &str) -> Option<VariableCategory> {
        self.lookup(name).map(|v| v.category)
    }

    pub fn scalar_type(&self, name: &str) -> Option<ScalarType> {
        self.lookup(name).map(|v| v.scalar_type)
    }

    /// Column position of `name` in canonical order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn static_variables(&self) -> &'static [&'static str] {
        &STATIC_VARIABLES
    }

    pub fn time_series_variables(&self) -> &'static [&'static str] {
        &TIME_SERIES_VARIABLES
    }

    /// Classifies a raw variable token. Matching is case-sensitive, as in
    /// the source files (`pH` and `PH` are different names).
    pub fn classify(&self, name: &str) -> Classification {
        if name == RECORD_ID {
            return Classification::RecordId;
        }
        if let Some(idx) = self.static_index.get(name) {
            return Classification::Static(*idx);
        }
        if let Some(idx) = self.series_index.get(name) {
            return Classification::TimeSeries(*idx);
        }
        Classification::Unknown
    }
}

static REGISTRY: OnceLock<SchemaRegistry> = OnceLock::new();

/// Returns the process-wide variable catalog, building it on first access.
pub fn schema_registry() -> &'static SchemaRegistry {
    REGISTRY.get_or_init(SchemaRegistry::build)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn categories_partition_the_catalog() {
        let registry = schema_registry();
        let mut seen = HashSet::new();
        for variable in registry.variables() {
            assert!(seen.insert(variable.name), "duplicate {}", variable.name);
        }
        assert_eq!(seen.len(), 2 + 4 + 37);
        let keys = registry
            .variables()
            .iter()
            .filter(|v| v.category == VariableCategory::Key)
            .count();
        assert_eq!(keys, KEY_VARIABLES.len());
    }

    #[test]
    fn declared_types() {
        let registry = schema_registry();
        assert_eq!(registry.scalar_type(RECORD_ID), Some(ScalarType::String));
        assert_eq!(registry.scalar_type(HOUR), Some(ScalarType::Integer));
        assert_eq!(
            registry.scalar_type("Gender"),
            Some(ScalarType::Categorical)
        );
        assert_eq!(registry.scalar_type("Age"), Some(ScalarType::Float));
        assert_eq!(registry.scalar_type("pH"), Some(ScalarType::Float));
        assert_eq!(registry.scalar_type("Unknown"), None);
    }

    #[test]
    fn column_order_is_keys_static_series() {
        let registry = schema_registry();
        let orders: Vec<u8> = registry
            .variables()
            .iter()
            .map(|v| v.category.sort_order())
            .collect();
        let mut sorted = orders.clone();
        sorted.sort_unstable();
        assert_eq!(orders, sorted);
        assert_eq!(registry.position(RECORD_ID), Some(0));
        assert_eq!(registry.position("Age"), Some(2));
        assert_eq!(registry.position("ALP"), Some(6));
    }

    #[test]
    fn classify_tokens() {
        let registry = schema_registry();
        assert_eq!(registry.classify("RecordID"), Classification::RecordId);
        assert_eq!(registry.classify("Weight"), Classification::Static(3));
        assert_eq!(registry.classify("HR"), Classification::TimeSeries(14));
        assert_eq!(registry.classify("Hour"), Classification::Unknown);
        assert_eq!(registry.classify("PH"), Classification::Unknown);
    }
}
