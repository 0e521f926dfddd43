//! Hourly long-format assembly of one patient's observations.
//!
//! The assembler is fed one line at a time and keeps a contiguous block of
//! hourly rows. Rows are created on demand so that the block never has gaps:
//! an observation after the last covered hour appends rows up to it, an
//! observation before the first covered hour prepends rows down to it, and an
//! observation inside the block lands in its existing row. Within an hour the
//! last value in file order wins.
//!
//! Static variables and the record identifier are held aside and broadcast
//! to every row by [`HourlyAssembler::finish`].

use std::collections::VecDeque;
use std::ops::RangeInclusive;

use tracing::{debug, warn};

use icu_common::parse_f64;
use icu_model::{
    AssemblyOptions, CategoricalColumn, Classification, ColumnData, GapFillPolicy, LongTable,
    ModelError, RECORD_ID, ScalarType, SchemaRegistry, TypedColumn, VariableCategory,
    schema_registry,
};

use crate::issue::{IssueKind, LineIssue};
use crate::line::{LineError, RawObservation, parse_fields, parse_line};
use crate::timestamp::{HourBucket, TimestampError};

type SeriesRow = Vec<Option<f64>>;

/// A finalized patient table.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientTable {
    /// Value of the last `RecordID` line, or empty when there was none.
    pub record_id: String,
    pub table: LongTable,
    pub issues: Vec<LineIssue>,
}

impl PatientTable {
    pub fn height(&self) -> usize {
        self.table.height()
    }

    /// Covered hours, first to last.
    pub fn hours(&self) -> Vec<i64> {
        self.table
            .integer_values(icu_model::HOUR)
            .map(|hours| hours.iter().flatten().copied().collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
struct PendingStatic {
    value: String,
    line: u64,
}

/// Incremental builder for a [`PatientTable`].
#[derive(Debug)]
pub struct HourlyAssembler {
    source: String,
    registry: &'static SchemaRegistry,
    options: AssemblyOptions,
    first_hour: Option<u32>,
    rows: VecDeque<SeriesRow>,
    statics: Vec<Option<PendingStatic>>,
    record_id: Option<String>,
    issues: Vec<LineIssue>,
}

impl HourlyAssembler {
    /// `source` names the file in diagnostics.
    pub fn new(source: impl Into<String>, options: AssemblyOptions) -> Self {
        let registry = schema_registry();
        Self {
            source: source.into(),
            registry,
            options,
            first_hour: None,
            rows: VecDeque::new(),
            statics: vec![None; registry.static_variables().len()],
            record_id: None,
            issues: Vec::new(),
        }
    }

    /// Covered hour range, `None` before the first accepted line.
    pub fn hour_range(&self) -> Option<RangeInclusive<u32>> {
        let first = self.first_hour?;
        let last = first + (self.rows.len() as u32).saturating_sub(1);
        Some(first..=last)
    }

    pub fn issues(&self) -> &[LineIssue] {
        &self.issues
    }

    /// Feeds one raw text line.
    pub fn push_line(&mut self, line: u64, text: &str) {
        match parse_line(text) {
            Ok(observation) => self.push_observation(line, observation),
            Err(err) => self.record_format_error(line, &err),
        }
    }

    /// Feeds one line that has already been split into fields.
    pub fn push_fields(&mut self, line: u64, fields: &[&str]) {
        match parse_fields(fields.iter().copied()) {
            Ok(observation) => self.push_observation(line, observation),
            Err(err) => self.record_format_error(line, &err),
        }
    }

    pub fn push_observation(&mut self, line: u64, observation: RawObservation) {
        let hour = match HourBucket::from_timestamp(&observation.timestamp) {
            Ok(hour) if hour.value() > self.options.max_hour => {
                let err = TimestampError::BeyondLimit {
                    timestamp: observation.timestamp,
                    hour: hour.value(),
                    max: self.options.max_hour,
                };
                self.record_format_error(line, &LineError::from(err));
                return;
            }
            Ok(hour) => hour,
            Err(err) => {
                self.record_format_error(line, &LineError::from(err));
                return;
            }
        };
        let row = self.cover(hour.value());
        let RawObservation {
            variable, value, ..
        } = observation;

        match self.registry.classify(&variable) {
            Classification::RecordId => self.record_id = Some(value),
            Classification::Static(idx) => {
                self.statics[idx] = Some(PendingStatic { value, line });
            }
            Classification::TimeSeries(idx) => match parse_f64(&value) {
                Some(number) => self.rows[row][idx] = Some(number),
                None => {
                    warn!(
                        file = %self.source,
                        line,
                        variable = %variable,
                        value = %value,
                        "value cannot be converted to float"
                    );
                    self.issues.push(LineIssue {
                        line,
                        kind: IssueKind::ValueConversion,
                        message: format!("value '{value}' of {variable} is not a number"),
                        variable: Some(variable),
                        value: Some(value),
                    });
                }
            },
            Classification::Unknown => {
                warn!(
                    file = %self.source,
                    line,
                    variable = %variable,
                    "unknown variable skipped"
                );
                self.issues.push(LineIssue {
                    line,
                    kind: IssueKind::UnknownVariable,
                    message: format!("variable {variable} is not in the catalog"),
                    variable: Some(variable),
                    value: Some(value),
                });
            }
        }
    }

    /// Logs and records a line that was skipped.
    pub fn record_format_error(&mut self, line: u64, err: &LineError) {
        warn!(file = %self.source, line, error = %err, "data format error, line skipped");
        self.issues.push(LineIssue {
            line,
            kind: IssueKind::Format,
            variable: None,
            value: None,
            message: err.to_string(),
        });
    }

    /// Extends the row block so that it covers `hour` and returns the row index.
    fn cover(&mut self, hour: u32) -> usize {
        let width = self.registry.time_series_variables().len();
        let first = match self.first_hour {
            None => {
                let first = match self.options.gap_fill {
                    GapFillPolicy::FirstObservation => hour,
                    GapFillPolicy::Admission => 0,
                };
                self.first_hour = Some(first);
                first
            }
            Some(first) if hour < first => {
                for _ in hour..first {
                    self.rows.push_front(vec![None; width]);
                }
                self.first_hour = Some(hour);
                hour
            }
            Some(first) => first,
        };
        let offset = (hour - first) as usize;
        while self.rows.len() <= offset {
            self.rows.push_back(vec![None; width]);
        }
        offset
    }

    /// Broadcasts statics and the record identifier and builds the table.
    pub fn finish(mut self) -> Result<PatientTable, ModelError> {
        let height = self.rows.len();
        let first = i64::from(self.first_hour.unwrap_or(0));
        let record_id = self.record_id.take().unwrap_or_default();
        let static_values = self.coerce_statics();

        let mut columns = Vec::with_capacity(self.registry.variables().len());
        for variable in self.registry.variables() {
            let data = match (variable.category, self.registry.classify(variable.name)) {
                (VariableCategory::Key, _) if variable.name == RECORD_ID => {
                    ColumnData::String(vec![Some(record_id.clone()); height])
                }
                (VariableCategory::Key, _) => {
                    ColumnData::Integer((0..height as i64).map(|i| Some(first + i)).collect())
                }
                (VariableCategory::Static, Classification::Static(idx)) => {
                    broadcast(&static_values[idx], variable.scalar_type, height)
                }
                (VariableCategory::TimeSeries, Classification::TimeSeries(idx)) => {
                    ColumnData::Float(self.rows.iter().map(|row| row[idx]).collect())
                }
                _ => return Err(ModelError::UnknownVariable(variable.name.to_string())),
            };
            columns.push(TypedColumn::new(variable.name, data));
        }

        debug!(
            file = %self.source,
            record_id = %record_id,
            rows = height,
            issues = self.issues.len(),
            "patient table assembled"
        );

        Ok(PatientTable {
            record_id,
            table: LongTable::from_columns(columns)?,
            issues: self.issues,
        })
    }

    fn coerce_statics(&mut self) -> Vec<Option<String>> {
        let names = self.registry.static_variables();
        let mut coerced = Vec::with_capacity(names.len());
        for (idx, name) in names.iter().enumerate() {
            let Some(pending) = self.statics[idx].take() else {
                coerced.push(None);
                continue;
            };
            let scalar_type = self.registry.scalar_type(name).unwrap_or(ScalarType::Float);
            let valid = match scalar_type {
                ScalarType::Float => parse_f64(&pending.value).is_some(),
                _ => !pending.value.is_empty(),
            };
            if valid {
                coerced.push(Some(pending.value));
                continue;
            }
            warn!(
                file = %self.source,
                line = pending.line,
                variable = %name,
                value = %pending.value,
                "static value cannot be converted to {scalar_type}"
            );
            self.issues.push(LineIssue {
                line: pending.line,
                kind: IssueKind::ValueConversion,
                variable: Some((*name).to_string()),
                message: format!("value '{}' of {name} is not a valid {scalar_type}", pending.value),
                value: Some(pending.value),
            });
            coerced.push(None);
        }
        coerced
    }
}

fn broadcast(value: &Option<String>, scalar_type: ScalarType, height: usize) -> ColumnData {
    match scalar_type {
        ScalarType::Float => {
            let number = value.as_deref().and_then(parse_f64);
            ColumnData::Float(vec![number; height])
        }
        ScalarType::Categorical => {
            let mut column = CategoricalColumn::with_capacity(height);
            for _ in 0..height {
                column.push(value.as_deref());
            }
            ColumnData::Categorical(column)
        }
        ScalarType::Integer => {
            let number = value.as_deref().and_then(icu_common::parse_i64);
            ColumnData::Integer(vec![number; height])
        }
        ScalarType::String => ColumnData::String(vec![value.clone(); height]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icu_model::HOUR;

    fn assemble(lines: &[&str], gap_fill: GapFillPolicy) -> PatientTable {
        let mut assembler = HourlyAssembler::new("test.txt", AssemblyOptions { gap_fill, ..AssemblyOptions::default() });
        for (idx, line) in lines.iter().enumerate() {
            assembler.push_line(idx as u64 + 2, line);
        }
        assembler.finish().unwrap()
    }

    #[test]
    fn gaps_between_observations_are_filled() {
        let patient = assemble(
            &["02:00,HR,80", "05:00,HR,90"],
            GapFillPolicy::FirstObservation,
        );
        assert_eq!(patient.hours(), vec![2, 3, 4, 5]);
        assert_eq!(
            patient.table.float_values("HR").unwrap(),
            &[Some(80.0), None, None, Some(90.0)]
        );
    }

    #[test]
    fn admission_policy_starts_at_zero() {
        let patient = assemble(&["02:00,HR,80", "05:00,HR,90"], GapFillPolicy::Admission);
        assert_eq!(patient.hours(), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn earlier_hour_extends_block_downward() {
        let patient = assemble(
            &["05:00,HR,90", "02:00,HR,80", "04:00,HR,85"],
            GapFillPolicy::FirstObservation,
        );
        assert_eq!(patient.hours(), vec![2, 3, 4, 5]);
        assert_eq!(
            patient.table.float_values("HR").unwrap(),
            &[Some(80.0), None, Some(85.0), Some(90.0)]
        );
    }

    #[test]
    fn last_value_within_hour_wins() {
        let patient = assemble(
            &["00:10,HR,70", "00:40,HR,75", "01:00,HR,72"],
            GapFillPolicy::FirstObservation,
        );
        assert_eq!(patient.hours(), vec![1]);
        assert_eq!(patient.table.float_values("HR").unwrap(), &[Some(72.0)]);
    }

    #[test]
    fn statics_and_record_id_are_broadcast() {
        let patient = assemble(
            &[
                "00:00,RecordID,132539",
                "00:00,Age,54",
                "00:00,Gender,0",
                "00:00,Weight,-1",
                "02:30,Temp,37.1",
            ],
            GapFillPolicy::FirstObservation,
        );
        assert_eq!(patient.record_id, "132539");
        assert_eq!(patient.height(), 4);
        assert!(
            patient
                .table
                .string_values(RECORD_ID)
                .unwrap()
                .iter()
                .all(|v| v.as_deref() == Some("132539"))
        );
        assert_eq!(patient.table.float_values("Age").unwrap(), &[Some(54.0); 4]);
        assert_eq!(patient.table.float_values("Height").unwrap(), &[None; 4]);
        assert_eq!(patient.table.float_values("Weight").unwrap(), &[Some(-1.0); 4]);
        let gender = patient.table.categorical_values("Gender").unwrap();
        assert!(gender.iter().all(|v| v == Some("0")));
    }

    #[test]
    fn missing_record_id_is_empty_string() {
        let patient = assemble(&["00:00,HR,80"], GapFillPolicy::FirstObservation);
        assert_eq!(patient.record_id, "");
        assert_eq!(
            patient.table.string_values(RECORD_ID).unwrap(),
            &[Some(String::new())]
        );
    }

    #[test]
    fn header_only_file_yields_empty_table() {
        let patient = assemble(&[], GapFillPolicy::FirstObservation);
        assert_eq!(patient.height(), 0);
        assert_eq!(patient.table.width(), 43);
        assert!(patient.issues.is_empty());
    }

    #[test]
    fn hours_past_the_limit_are_format_errors() {
        let options = AssemblyOptions {
            max_hour: 48,
            ..AssemblyOptions::default()
        };
        let mut assembler = HourlyAssembler::new("limit.txt", options);
        assembler.push_line(2, "00:00,HR,70");
        assembler.push_line(3, "4000000:00,HR,71");
        assembler.push_line(4, "48:00,HR,72");
        assembler.push_line(5, "48:01,HR,73");
        let patient = assembler.finish().unwrap();

        assert_eq!(patient.height(), 49);
        let lines: Vec<u64> = patient.issues.iter().map(|i| i.line).collect();
        assert_eq!(lines, vec![3, 5]);
        assert!(patient.issues.iter().all(|i| i.kind == IssueKind::Format));
        insta::assert_snapshot!(
            patient.issues[0].message,
            @"timestamp '4000000:00' falls in hour 4000000, past the limit of 48"
        );
    }

    #[test]
    fn bad_lines_are_recorded_and_skipped() {
        let patient = assemble(
            &["00:00,HR", "xx:00,HR,80", "01:00,HR,abc", "01:00,Foo,1", "01:00,Hour,3"],
            GapFillPolicy::FirstObservation,
        );
        let kinds: Vec<IssueKind> = patient.issues.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                IssueKind::Format,
                IssueKind::Format,
                IssueKind::ValueConversion,
                IssueKind::UnknownVariable,
                IssueKind::UnknownVariable,
            ]
        );
        assert_eq!(patient.issues[0].line, 2);
        assert_eq!(patient.issues[2].value.as_deref(), Some("abc"));
        // Unparseable and unknown values still contribute their hour.
        assert_eq!(patient.hours(), vec![1]);
        assert_eq!(patient.table.float_values("HR").unwrap(), &[None]);
        assert!(patient.table.column("Foo").is_none());
        assert_eq!(patient.table.integer_values(HOUR).unwrap(), &[Some(1)]);
    }

    #[test]
    fn invalid_static_is_unset_and_reported() {
        let patient = assemble(
            &["00:00,Height,tall", "00:00,Gender,", "01:00,HR,60"],
            GapFillPolicy::FirstObservation,
        );
        assert_eq!(patient.table.float_values("Height").unwrap(), &[None, None]);
        let gender = patient.table.categorical_values("Gender").unwrap();
        assert!(gender.iter().all(|v| v.is_none()));
        let conversions: Vec<_> = patient
            .issues
            .iter()
            .filter(|i| i.kind == IssueKind::ValueConversion)
            .map(|i| (i.line, i.variable.clone()))
            .collect();
        assert_eq!(
            conversions,
            vec![(3, Some("Gender".to_string())), (2, Some("Height".to_string()))]
        );
    }

    #[test]
    fn hour_range_tracks_block() {
        let mut assembler = HourlyAssembler::new("x", AssemblyOptions::default());
        assert_eq!(assembler.hour_range(), None);
        assembler.push_line(2, "03:00,HR,1");
        assert_eq!(assembler.hour_range(), Some(3..=3));
        assembler.push_line(3, "01:00,HR,1");
        assembler.push_line(4, "06:00,HR,1");
        assert_eq!(assembler.hour_range(), Some(1..=6));
    }
}
