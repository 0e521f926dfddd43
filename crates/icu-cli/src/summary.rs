use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use icu_common::format_numeric;
use icu_report::{HourSpread, VariableProfile};

use icu_cli::types::{PrepareResult, SampleSummary, SplitSummary};

pub fn print_summary(result: &PrepareResult) {
    println!("Raw data: {}", result.raw_root.display());
    println!("Output: {}", result.data_dir.display());
    println!(
        "Mode: {} | gap fill: {} | compression: {}",
        result.mode, result.gap_fill, result.compression
    );
    if result.dry_run {
        println!("Dry run: no files written");
    }
    if let Some(path) = &result.manifest {
        println!("Manifest: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Split"),
        header_cell("Source"),
        header_cell("Files"),
        header_cell("Patients"),
        header_cell("Rows"),
        header_cell("Outcomes"),
        header_cell("Format"),
        header_cell("Conversion"),
        header_cell("Unknown"),
        header_cell("Failures"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..10 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let mut total_patients = 0usize;
    let mut total_rows = 0usize;
    let mut total_failures = 0usize;
    for summary in &result.splits {
        total_patients += summary.patients;
        total_rows += summary.rows;
        total_failures += summary.failures.len();
        table.add_row(split_row(summary));
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(total_patients).add_attribute(Attribute::Bold),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        count_cell(Some(total_failures), Color::Red),
    ]);
    println!("{table}");

    print_failures(result);
}

fn split_row(summary: &SplitSummary) -> Vec<Cell> {
    let source = summary
        .source_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    if summary.error.is_some() {
        return vec![
            split_cell(summary),
            Cell::new(source),
            Cell::new(summary.patient_files),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            Cell::new("aborted")
                .fg(Color::Red)
                .add_attribute(Attribute::Bold),
        ];
    }
    vec![
        split_cell(summary),
        Cell::new(source),
        Cell::new(summary.patient_files),
        Cell::new(summary.patients),
        Cell::new(summary.rows),
        Cell::new(format!(
            "{}/{}",
            summary.matched_outcome_rows, summary.outcome_rows
        )),
        count_cell(Some(summary.issues.format), Color::Yellow),
        count_cell(Some(summary.issues.value_conversion), Color::Yellow),
        count_cell(Some(summary.issues.unknown_variable), Color::Yellow),
        count_cell(Some(summary.failures.len()), Color::Red),
    ]
}

fn print_failures(result: &PrepareResult) {
    if !result.has_errors() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Split"),
        header_cell("File"),
        header_cell("Error"),
    ]);
    apply_table_style(&mut table);
    for summary in &result.splits {
        if let Some(message) = &summary.error {
            table.add_row(vec![
                split_cell(summary),
                dim_cell("-"),
                Cell::new(message).fg(Color::Red),
            ]);
        }
        for failure in &summary.failures {
            table.add_row(vec![
                split_cell(summary),
                Cell::new(failure.path.display()),
                Cell::new(&failure.message).fg(Color::Red),
            ]);
        }
    }
    eprintln!();
    eprintln!("Failures:");
    eprintln!("{table}");
}

pub fn print_samples(samples: &[SampleSummary]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Split"),
        header_cell("Sample directory"),
        header_cell("State"),
        header_cell("Copied"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for sample in samples {
        let state = if sample.created {
            Cell::new("created").fg(Color::Green)
        } else {
            dim_cell("existing")
        };
        table.add_row(vec![
            Cell::new(sample.split)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(sample.path.display()),
            state,
            Cell::new(sample.copied),
        ]);
    }
    println!("{table}");
}

pub fn print_profiles(rows: usize, profiles: &[VariableProfile]) {
    println!("Rows: {rows}");
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Variable"),
        header_cell("Observed"),
        header_cell("Missing"),
        header_cell("Min"),
        header_cell("Median"),
        header_cell("Max"),
    ]);
    apply_table_style(&mut table);
    for index in 1..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for profile in profiles {
        table.add_row(vec![
            Cell::new(&profile.variable),
            Cell::new(profile.observed),
            Cell::new(format!("{:.1}%", profile.missing_fraction * 100.0)),
            number_cell(profile.min),
            number_cell(profile.median),
            number_cell(profile.max),
        ]);
    }
    println!("{table}");
}

pub fn print_spread(variable: &str, spread: &[HourSpread]) {
    println!();
    println!("Hourly spread of {variable} around its median:");
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Hour"),
        header_cell("Observed"),
        header_cell("Median"),
        header_cell("2.5%"),
        header_cell("97.5%"),
    ]);
    apply_table_style(&mut table);
    for index in 0..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for hour in spread {
        table.add_row(vec![
            Cell::new(hour.hour),
            Cell::new(hour.observed),
            Cell::new(format_numeric(hour.median)),
            Cell::new(format!("{:.2}", hour.lower)),
            Cell::new(format!("{:.2}", hour.upper)),
        ]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn split_cell(summary: &SplitSummary) -> Cell {
    Cell::new(summary.split)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: Option<usize>, color: Color) -> Cell {
    match count {
        Some(value) if value > 0 => Cell::new(value).fg(color).add_attribute(Attribute::Bold),
        Some(value) => dim_cell(value),
        None => dim_cell("-"),
    }
}

fn number_cell(value: Option<f64>) -> Cell {
    match value {
        Some(v) => Cell::new(format_numeric(v)),
        None => dim_cell("-"),
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
