//! Invariants of the hourly assembler over generated observation streams.

use std::collections::BTreeMap;

use icu_ingest::HourlyAssembler;
use icu_model::{AssemblyOptions, GapFillPolicy, HOUR, RECORD_ID};
use proptest::prelude::*;

fn observations() -> impl Strategy<Value = Vec<(u32, u32, i32)>> {
    prop::collection::vec((0u32..72, 0u32..60, -50i32..250), 1..60)
}

fn assemble(obs: &[(u32, u32, i32)], gap_fill: GapFillPolicy) -> icu_ingest::PatientTable {
    let mut assembler = HourlyAssembler::new("generated.txt", AssemblyOptions { gap_fill, ..AssemblyOptions::default() });
    assembler.push_line(2, "00:00,RecordID,140000");
    for (idx, (hours, minutes, value)) in obs.iter().enumerate() {
        assembler.push_line(idx as u64 + 3, &format!("{hours:02}:{minutes:02},HR,{value}"));
    }
    assembler.finish().expect("finish")
}

fn bucket(hours: u32, minutes: u32) -> i64 {
    i64::from(hours) + i64::from(minutes > 0)
}

proptest! {
    #[test]
    fn hours_are_contiguous_and_unique(obs in observations()) {
        let patient = assemble(&obs, GapFillPolicy::FirstObservation);
        let hours = patient.hours();
        let last = obs.iter().map(|(h, m, _)| bucket(*h, *m)).max().unwrap_or(0);
        // The RecordID line at 00:00 pins the first hour to 0.
        prop_assert_eq!(hours, (0..=last).collect::<Vec<_>>());
    }

    #[test]
    fn block_spans_first_to_last_observation(obs in observations()) {
        let mut assembler = HourlyAssembler::new("generated.txt", AssemblyOptions::default());
        for (idx, (hours, minutes, value)) in obs.iter().enumerate() {
            assembler.push_line(idx as u64 + 2, &format!("{hours:02}:{minutes:02},HR,{value}"));
        }
        let patient = assembler.finish().expect("finish");
        let first = obs.iter().map(|(h, m, _)| bucket(*h, *m)).min().unwrap_or(0);
        let last = obs.iter().map(|(h, m, _)| bucket(*h, *m)).max().unwrap_or(0);
        prop_assert_eq!(patient.hours(), (first..=last).collect::<Vec<_>>());
    }

    #[test]
    fn last_value_per_hour_wins(obs in observations()) {
        let patient = assemble(&obs, GapFillPolicy::FirstObservation);
        let mut expected: BTreeMap<i64, f64> = BTreeMap::new();
        for (h, m, v) in &obs {
            expected.insert(bucket(*h, *m), f64::from(*v));
        }
        let hours = patient.table.integer_values(HOUR).unwrap();
        let hr = patient.table.float_values("HR").unwrap();
        for (hour, value) in hours.iter().zip(hr) {
            let hour = hour.unwrap();
            prop_assert_eq!(*value, expected.get(&hour).copied());
        }
    }

    #[test]
    fn record_id_is_constant(obs in observations()) {
        let patient = assemble(&obs, GapFillPolicy::Admission);
        let ids = patient.table.string_values(RECORD_ID).unwrap();
        prop_assert!(ids.iter().all(|id| id.as_deref() == Some("140000")));
        prop_assert_eq!(patient.hours().first().copied(), Some(0));
    }
}

fn assemble_lines(lines: &[String]) -> icu_ingest::PatientTable {
    let mut assembler = HourlyAssembler::new("generated.txt", AssemblyOptions::default());
    for (idx, text) in lines.iter().enumerate() {
        assembler.push_line(idx as u64 + 2, text);
    }
    assembler.finish().expect("finish")
}

proptest! {
    #[test]
    fn one_short_line_changes_nothing_but_the_issues(
        obs in observations(),
        position in any::<prop::sample::Index>(),
    ) {
        let mut lines: Vec<String> = vec!["00:00,RecordID,140000".to_string()];
        lines.extend(
            obs.iter()
                .map(|(hours, minutes, value)| format!("{hours:02}:{minutes:02},HR,{value}")),
        );
        let clean = assemble_lines(&lines);

        let at = position.index(lines.len() + 1);
        lines.insert(at, "01:00,HR".to_string());
        let with_bad = assemble_lines(&lines);

        prop_assert_eq!(&with_bad.table, &clean.table);
        prop_assert!(clean.issues.is_empty());
        prop_assert_eq!(with_bad.issues.len(), 1);
        prop_assert_eq!(with_bad.issues[0].kind, icu_ingest::IssueKind::Format);
        prop_assert_eq!(with_bad.issues[0].line, at as u64 + 2);
    }
}

#[test]
fn out_of_order_lines_merge_into_existing_rows() {
    let mut assembler = HourlyAssembler::new("x.txt", AssemblyOptions::default());
    for (line, text) in [
        "01:00,HR,60",
        "04:00,HR,64",
        "02:30,Temp,36.6",
        "03:00,HR,63",
        "01:00,Temp,36.1",
    ]
    .iter()
    .enumerate()
    {
        assembler.push_line(line as u64 + 2, text);
    }
    let patient = assembler.finish().unwrap();
    assert_eq!(patient.hours(), vec![1, 2, 3, 4]);
    assert_eq!(
        patient.table.float_values("HR").unwrap(),
        &[Some(60.0), None, Some(63.0), Some(64.0)]
    );
    assert_eq!(
        patient.table.float_values("Temp").unwrap(),
        &[Some(36.1), None, Some(36.6), None]
    );
}
