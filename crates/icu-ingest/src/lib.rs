//! Ingestion of PhysioNet 2012 patient records.
//!
//! Each patient file is a `Time,Parameter,Value` listing. This crate turns a
//! file into an hourly [`PatientTable`], finds split directories and their
//! patient files, builds development samples and loads outcome tables.

pub mod assembler;
pub mod discovery;
pub mod error;
pub mod issue;
pub mod line;
pub mod outcomes;
pub mod reader;
pub mod sample;
pub mod timestamp;

pub use assembler::{HourlyAssembler, PatientTable};
pub use discovery::{
    SAMPLE_SUFFIX, list_patient_files, outcome_file, resolve_split_dirs, split_from_dir_name,
};
pub use error::{IngestError, Result};
pub use issue::{IssueCounts, IssueKind, LineIssue};
pub use line::{FIELD_COUNT, LineError, RawObservation, parse_fields, parse_line};
pub use outcomes::read_outcomes;
pub use reader::read_patient_file;
pub use sample::{SampleDir, create_sample, sample_dir_for};
pub use timestamp::{HourBucket, TimestampError};
