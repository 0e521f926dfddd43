//! Reading one patient file into a [`PatientTable`].

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use icu_model::AssemblyOptions;

use crate::assembler::{HourlyAssembler, PatientTable};
use crate::error::{IngestError, Result};
use crate::line::LineError;

/// Reads a `Time,Parameter,Value` patient file.
///
/// The header line is skipped and every following line is fed to an
/// [`HourlyAssembler`] with its 1-based line number. Quotes have no meaning:
/// a line is split on every comma. Blank lines carry no observation and are
/// skipped without recording an issue. Bad lines are recorded on the
/// returned table; only I/O failures end the read with an error.
pub fn read_patient_file(path: &Path, options: AssemblyOptions) -> Result<PatientTable> {
    let file = File::open(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(file));

    let source = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mut assembler = HourlyAssembler::new(source, options);

    let mut record = csv::ByteRecord::new();
    loop {
        match reader.read_byte_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => return Err(csv_error(path, err)),
        }
        let line = record.position().map_or(0, csv::Position::line);
        let fields: std::result::Result<Vec<&str>, _> =
            record.iter().map(std::str::from_utf8).collect();
        match fields {
            Ok(fields) => assembler.push_fields(line, &fields),
            Err(_) => assembler.record_format_error(line, &LineError::InvalidUtf8),
        }
    }

    Ok(assembler.finish()?)
}

fn csv_error(path: &Path, err: csv::Error) -> IngestError {
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        },
        _ => IngestError::CsvParse {
            path: path.to_path_buf(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::IssueKind;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn reads_patient_file() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "132539.txt",
            b"Time,Parameter,Value\n00:00,RecordID,132539\n00:00,Age,54\n\n00:07,GCS,15\n01:37,GCS,14\n",
        );
        let patient = read_patient_file(&path, AssemblyOptions::default()).unwrap();
        assert_eq!(patient.record_id, "132539");
        assert_eq!(patient.hours(), vec![0, 1, 2]);
        assert_eq!(
            patient.table.float_values("GCS").unwrap(),
            &[None, Some(15.0), Some(14.0)]
        );
        assert!(patient.issues.is_empty());
    }

    #[test]
    fn invalid_utf8_line_is_a_format_issue() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "1.txt",
            b"Time,Parameter,Value\n00:00,HR,\xff\xfe\n01:00,HR,70\n",
        );
        let patient = read_patient_file(&path, AssemblyOptions::default()).unwrap();
        assert_eq!(patient.issues.len(), 1);
        assert_eq!(patient.issues[0].kind, IssueKind::Format);
        assert_eq!(patient.issues[0].line, 2);
        assert_eq!(patient.table.float_values("HR").unwrap(), &[Some(70.0)]);
    }

    #[test]
    fn line_numbers_include_header() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "2.txt", b"Time,Parameter,Value\n00:00,HR,1\n00:00,HR\n");
        let patient = read_patient_file(&path, AssemblyOptions::default()).unwrap();
        assert_eq!(patient.issues[0].line, 3);
    }

    #[test]
    fn stray_quote_stays_on_its_line() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "4.txt",
            b"Time,Parameter,Value\n00:00,HR,\"73\n01:00,HR,80\n02:00,HR,90\n03:00,Temp,37\n",
        );
        let patient = read_patient_file(&path, AssemblyOptions::default()).unwrap();
        assert_eq!(patient.hours(), vec![0, 1, 2, 3]);
        assert_eq!(
            patient.table.float_values("HR").unwrap(),
            &[None, Some(80.0), Some(90.0), None]
        );
        assert_eq!(patient.issues.len(), 1);
        assert_eq!(patient.issues[0].kind, IssueKind::ValueConversion);
        assert_eq!(patient.issues[0].line, 2);
        assert_eq!(patient.issues[0].value.as_deref(), Some("\"73"));
    }

    #[test]
    fn quoted_comma_is_a_field_separator() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "5.txt",
            b"Time,Parameter,Value\n00:00,HR,70\n01:00,HR,\"8,0\"\n",
        );
        let patient = read_patient_file(&path, AssemblyOptions::default()).unwrap();
        assert_eq!(patient.issues.len(), 1);
        assert_eq!(patient.issues[0].kind, IssueKind::Format);
        assert_eq!(patient.issues[0].line, 3);
        assert_eq!(patient.table.float_values("HR").unwrap(), &[Some(70.0)]);
    }

    #[test]
    fn blank_lines_are_skipped_without_issue() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "6.txt",
            b"Time,Parameter,Value\n\n00:00,HR,70\n\n\n01:00,HR,71\n\n",
        );
        let patient = read_patient_file(&path, AssemblyOptions::default()).unwrap();
        assert!(patient.issues.is_empty());
        assert_eq!(patient.hours(), vec![0, 1]);
    }

    #[test]
    fn empty_file_yields_empty_table() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "3.txt", b"");
        let patient = read_patient_file(&path, AssemblyOptions::default()).unwrap();
        assert_eq!(patient.height(), 0);
        assert_eq!(patient.record_id, "");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = read_patient_file(&dir.path().join("absent.txt"), AssemblyOptions::default());
        assert!(matches!(result, Err(IngestError::FileRead { .. })));
    }
}
