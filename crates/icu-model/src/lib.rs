pub mod enums;
pub mod error;
pub mod options;
pub mod schema;
pub mod split;
pub mod table;

pub use enums::{ScalarType, VariableCategory};
pub use error::{ModelError, Result};
pub use options::{
    AssemblyOptions, DEFAULT_MAX_HOUR, FileFailurePolicy, GapFillPolicy, OutputCompression,
    PrepareOptions, RunMode,
};
pub use schema::{
    Classification, HOUR, KEY_VARIABLES, RECORD_ID, STATIC_VARIABLES, SchemaRegistry,
    TIME_SERIES_VARIABLES, Variable, schema_registry,
};
pub use split::Split;
pub use table::{CategoricalColumn, ColumnData, LongTable, TypedColumn};
