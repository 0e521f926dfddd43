//! Descriptive summaries over prepared cohort tables.
//!
//! These are the numbers behind the exploration plots: distribution profiles
//! per variable, the share of missing values per hour, and the spread of
//! values around their hourly median.

mod missingness;
mod profile;
mod spread;
pub mod stats;

pub use missingness::hourly_missingness;
pub use profile::{VariableProfile, profile_variables};
pub use spread::{HourSpread, SPREAD_QUANTILES, median_centered_spread};
