//! Typed long-format tables.
//!
//! A [`LongTable`] is a set of equally long, typed columns. Column types are
//! fixed when the table is created from the [`SchemaRegistry`]; appending a
//! table with a different layout is rejected instead of coerced.

use crate::enums::ScalarType;
use crate::error::{ModelError, Result};
use crate::schema::SchemaRegistry;

/// Text column stored as codes into a first-seen level list.
#[derive(Debug, Clone, Default)]
pub struct CategoricalColumn {
    levels: Vec<String>,
    codes: Vec<Option<u32>>,
}

impl CategoricalColumn {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            levels: Vec::new(),
            codes: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, value: Option<&str>) {
        let code = value.map(|v| self.code_for(v));
        self.codes.push(code);
    }

    fn code_for(&mut self, value: &str) -> u32 {
        if let Some(pos) = self.levels.iter().position(|level| level == value) {
            return pos as u32;
        }
        self.levels.push(value.to_string());
        (self.levels.len() - 1) as u32
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        let code = (*self.codes.get(idx)?)?;
        self.levels.get(code as usize).map(String::as_str)
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&str>> + '_ {
        self.codes
            .iter()
            .map(|code| code.and_then(|c| self.levels.get(c as usize).map(String::as_str)))
    }

    /// Appends `other`, remapping its codes onto this column's levels.
    pub fn extend(&mut self, other: &CategoricalColumn) {
        self.codes.reserve(other.len());
        for value in other.iter() {
            self.push(value);
        }
    }
}

// Equality is on decoded values; level order is an encoding detail.
impl PartialEq for CategoricalColumn {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<'a> FromIterator<Option<&'a str>> for CategoricalColumn {
    fn from_iter<I: IntoIterator<Item = Option<&'a str>>>(iter: I) -> Self {
        let mut column = CategoricalColumn::new();
        for value in iter {
            column.push(value);
        }
        column
    }
}

/// Values of one column. `None` marks an unset cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    String(Vec<Option<String>>),
    Integer(Vec<Option<i64>>),
    Categorical(CategoricalColumn),
    Float(Vec<Option<f64>>),
}

impl ColumnData {
    pub fn empty(scalar_type: ScalarType) -> Self {
        match scalar_type {
            ScalarType::String => ColumnData::String(Vec::new()),
            ScalarType::Integer => ColumnData::Integer(Vec::new()),
            ScalarType::Categorical => ColumnData::Categorical(CategoricalColumn::new()),
            ScalarType::Float => ColumnData::Float(Vec::new()),
        }
    }

    pub fn scalar_type(&self) -> ScalarType {
        match self {
            ColumnData::String(_) => ScalarType::String,
            ColumnData::Integer(_) => ScalarType::Integer,
            ColumnData::Categorical(_) => ScalarType::Categorical,
            ColumnData::Float(_) => ScalarType::Float,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::String(values) => values.len(),
            ColumnData::Integer(values) => values.len(),
            ColumnData::Categorical(values) => values.len(),
            ColumnData::Float(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn null_count(&self) -> usize {
        match self {
            ColumnData::String(values) => values.iter().filter(|v| v.is_none()).count(),
            ColumnData::Integer(values) => values.iter().filter(|v| v.is_none()).count(),
            ColumnData::Categorical(values) => values.iter().filter(Option::is_none).count(),
            ColumnData::Float(values) => values.iter().filter(|v| v.is_none()).count(),
        }
    }

    /// Renders the cell at `idx` as text; unset cells render as `None`.
    pub fn display_value(&self, idx: usize) -> Option<String> {
        match self {
            ColumnData::String(values) => values.get(idx).cloned().flatten(),
            ColumnData::Integer(values) => values.get(idx).copied().flatten().map(|v| v.to_string()),
            ColumnData::Categorical(values) => values.get(idx).map(str::to_string),
            ColumnData::Float(values) => values.get(idx).copied().flatten().map(|v| v.to_string()),
        }
    }

    fn append(&mut self, other: ColumnData) -> std::result::Result<(), ScalarType> {
        match (self, other) {
            (ColumnData::String(left), ColumnData::String(right)) => left.extend(right),
            (ColumnData::Integer(left), ColumnData::Integer(right)) => left.extend(right),
            (ColumnData::Categorical(left), ColumnData::Categorical(right)) => left.extend(&right),
            (ColumnData::Float(left), ColumnData::Float(right)) => left.extend(right),
            (_, other) => return Err(other.scalar_type()),
        }
        Ok(())
    }
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedColumn {
    pub name: String,
    pub data: ColumnData,
}

impl TypedColumn {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn scalar_type(&self) -> ScalarType {
        self.data.scalar_type()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Column-oriented long-format table.
#[derive(Debug, Clone, PartialEq)]
pub struct LongTable {
    columns: Vec<TypedColumn>,
    height: usize,
}

impl LongTable {
    /// Creates a table with zero rows and one column per catalogued variable.
    pub fn empty(registry: &SchemaRegistry) -> Self {
        let columns = registry
            .variables()
            .iter()
            .map(|variable| TypedColumn::new(variable.name, ColumnData::empty(variable.scalar_type)))
            .collect();
        Self { columns, height: 0 }
    }

    /// Builds a table from columns of equal length.
    pub fn from_columns(columns: Vec<TypedColumn>) -> Result<Self> {
        let height = columns.first().map(TypedColumn::len).unwrap_or(0);
        if let Some(column) = columns.iter().find(|c| c.len() != height) {
            return Err(ModelError::ColumnLength {
                name: column.name.clone(),
                expected: height,
                actual: column.len(),
            });
        }
        Ok(Self { columns, height })
    }

    /// Checks that names and types follow the registry's canonical layout.
    pub fn conforms_to(&self, registry: &SchemaRegistry) -> Result<()> {
        let expected: Vec<String> = registry.column_names().iter().map(|n| n.to_string()).collect();
        let actual = self.column_names();
        if expected != actual {
            return Err(ModelError::ColumnLayout { expected, actual });
        }
        for (column, variable) in self.columns.iter().zip(registry.variables()) {
            if column.scalar_type() != variable.scalar_type {
                return Err(ModelError::ColumnType {
                    name: column.name.clone(),
                    expected: variable.scalar_type,
                    actual: column.scalar_type(),
                });
            }
        }
        Ok(())
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.height == 0
    }

    pub fn columns(&self) -> &[TypedColumn] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<TypedColumn> {
        self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&TypedColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn string_values(&self, name: &str) -> Option<&[Option<String>]> {
        match &self.column(name)?.data {
            ColumnData::String(values) => Some(values),
            _ => None,
        }
    }

    pub fn integer_values(&self, name: &str) -> Option<&[Option<i64>]> {
        match &self.column(name)?.data {
            ColumnData::Integer(values) => Some(values),
            _ => None,
        }
    }

    pub fn float_values(&self, name: &str) -> Option<&[Option<f64>]> {
        match &self.column(name)?.data {
            ColumnData::Float(values) => Some(values),
            _ => None,
        }
    }

    pub fn categorical_values(&self, name: &str) -> Option<&CategoricalColumn> {
        match &self.column(name)?.data {
            ColumnData::Categorical(values) => Some(values),
            _ => None,
        }
    }

    /// Appends the rows of `other`. Both tables must share names, order and types.
    pub fn append(&mut self, other: LongTable) -> Result<()> {
        let expected = self.column_names();
        let actual = other.column_names();
        if expected != actual {
            return Err(ModelError::ColumnLayout { expected, actual });
        }
        if let Some((left, right)) = self
            .columns
            .iter()
            .zip(other.columns.iter())
            .find(|(left, right)| left.scalar_type() != right.scalar_type())
        {
            return Err(ModelError::ColumnType {
                name: left.name.clone(),
                expected: left.scalar_type(),
                actual: right.scalar_type(),
            });
        }
        let added = other.height;
        for (left, right) in self.columns.iter_mut().zip(other.columns) {
            left.data
                .append(right.data)
                .map_err(|actual| ModelError::ColumnType {
                    name: left.name.clone(),
                    expected: left.data.scalar_type(),
                    actual,
                })?;
        }
        self.height += added;
        Ok(())
    }
}
