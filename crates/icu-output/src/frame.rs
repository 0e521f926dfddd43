//! Conversion between [`LongTable`] and polars frames.
//!
//! | Model type    | Frame dtype |
//! |---------------|-------------|
//! | String        | `String`    |
//! | Integer       | `Int64`     |
//! | Float         | `Float64`   |
//! | Categorical   | `String`    |
//!
//! Categorical columns are stored as text; [`frame_to_long_table`] re-types
//! them from the registry.

use polars::prelude::*;

use icu_model::{
    CategoricalColumn, ColumnData, LongTable, ModelError, ScalarType, SchemaRegistry, TypedColumn,
};

use crate::error::{OutputError, Result};

/// Builds a frame with one column per table column, in table order.
pub fn long_table_to_frame(table: &LongTable) -> Result<DataFrame> {
    let columns: Vec<Column> = table
        .columns()
        .iter()
        .map(|column| typed_to_series(column).into())
        .collect();
    Ok(DataFrame::new(columns)?)
}

fn typed_to_series(column: &TypedColumn) -> Series {
    let name: PlSmallStr = column.name.as_str().into();
    match &column.data {
        ColumnData::String(values) => Series::new(name, values.as_slice()),
        ColumnData::Integer(values) => Series::new(name, values.as_slice()),
        ColumnData::Float(values) => Series::new(name, values.as_slice()),
        ColumnData::Categorical(values) => {
            let text: Vec<Option<&str>> = values.iter().collect();
            Series::new(name, text.as_slice())
        }
    }
}

/// Rebuilds a typed table from a frame holding exactly the registry columns.
///
/// Columns are picked by name and placed in canonical order; values are cast
/// to the registry type (non-strict, so unparseable text becomes unset).
pub fn frame_to_long_table(frame: &DataFrame, registry: &SchemaRegistry) -> Result<LongTable> {
    let expected = registry.column_names();
    let actual: Vec<String> = frame
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let same_set = actual.len() == expected.len()
        && expected.iter().all(|name| actual.iter().any(|a| a == name));
    if !same_set {
        return Err(ModelError::ColumnLayout {
            expected: expected.iter().map(|n| n.to_string()).collect(),
            actual,
        }
        .into());
    }

    let mut columns = Vec::with_capacity(expected.len());
    for variable in registry.variables() {
        let column = frame
            .column(variable.name)
            .map_err(|_| OutputError::MissingColumn {
                column: variable.name.to_string(),
            })?;
        columns.push(TypedColumn::new(
            variable.name,
            column_data(column, variable.scalar_type)?,
        ));
    }
    Ok(LongTable::from_columns(columns)?)
}

fn column_data(column: &Column, scalar_type: ScalarType) -> Result<ColumnData> {
    let data = match scalar_type {
        ScalarType::String => {
            let cast = column.cast(&DataType::String)?;
            ColumnData::String(
                cast.str()?
                    .into_iter()
                    .map(|v| v.map(str::to_string))
                    .collect(),
            )
        }
        ScalarType::Integer => {
            let cast = column.cast(&DataType::Int64)?;
            ColumnData::Integer(cast.i64()?.into_iter().collect())
        }
        ScalarType::Float => {
            let cast = column.cast(&DataType::Float64)?;
            ColumnData::Float(cast.f64()?.into_iter().collect())
        }
        ScalarType::Categorical => {
            let cast = column.cast(&DataType::String)?;
            ColumnData::Categorical(cast.str()?.into_iter().collect::<CategoricalColumn>())
        }
    };
    Ok(data)
}
