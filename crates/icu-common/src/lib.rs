//! Shared utilities for the ICU preparation crates.
//!
//! Text rendering of polars cells and lenient number parsing.

pub mod polars;

pub use polars::{any_to_string, column_to_strings, format_numeric, parse_f64, parse_i64};
