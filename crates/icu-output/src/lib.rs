//! Persistence of prepared tables.
//!
//! Cohort tables and outcome tables are written as Parquet through polars.
//! A written cohort table reads back into an equal [`icu_model::LongTable`].

pub mod error;
pub mod frame;
pub mod parquet;

pub use error::{OutputError, Result};
pub use frame::{frame_to_long_table, long_table_to_frame};
pub use parquet::{
    SplitOutputs, ensure_output_dir, read_frame, read_long_table, write_frame, write_long_table,
};
