//! Cohort-level transformations.
//!
//! - [`assemble_cohort`] reads the patient files of a split and concatenates
//!   their hourly tables in file-name order.
//! - [`match_outcomes`] restricts an outcome table to the patients of a
//!   cohort when running on a development sample.

pub mod cohort;
pub mod error;
pub mod outcomes;

pub use cohort::{CohortTable, FileFailure, assemble_cohort};
pub use error::{Result, TransformError};
pub use outcomes::match_outcomes;
