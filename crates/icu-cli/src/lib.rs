//! Library components of the `icu-prep` command line tool.

pub mod logging;
pub mod pipeline;
pub mod progress;
pub mod types;
