use anyhow::{Context, Result, bail};
use comfy_table::Table;
use tracing::{info, info_span};

use icu_cli::pipeline::{PrepareRequest, run_prepare, sample_splits};
use icu_cli::progress::file_progress_bar;
use icu_cli::types::{PrepareResult, SampleSummary};
use icu_model::{FileFailurePolicy, PrepareOptions, RunMode, Split, schema_registry};
use icu_output::{read_frame, write_frame};
use icu_report::{hourly_missingness, median_centered_spread, profile_variables};

use crate::cli::{ExploreArgs, PrepareArgs, SampleArgs, selected_splits};
use crate::summary::{apply_table_style, header_cell, print_profiles, print_spread};

pub fn run_variables() -> Result<()> {
    let registry = schema_registry();
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Variable"),
        header_cell("Category"),
        header_cell("Type"),
    ]);
    apply_table_style(&mut table);
    for variable in registry.variables() {
        table.add_row(vec![
            variable.name.to_string(),
            variable.category.to_string(),
            variable.scalar_type.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_prepare_command(args: &PrepareArgs) -> Result<PrepareResult> {
    let request = prepare_request(args);
    let progress = file_progress_bar();
    run_prepare(&request, &progress)
}

fn prepare_request(args: &PrepareArgs) -> PrepareRequest {
    let mode = match args.sample {
        Some(size) => RunMode::Sample { size },
        None => RunMode::Full,
    };
    let file_failure = if args.abort_on_unreadable {
        FileFailurePolicy::Abort
    } else {
        FileFailurePolicy::Skip
    };
    let options = PrepareOptions {
        mode,
        gap_fill: args.gap_fill.into(),
        file_failure,
        compression: args.compression.into(),
        dry_run: args.dry_run,
    };
    PrepareRequest {
        raw_root: args.raw_root.clone(),
        data_dir: args
            .data_dir
            .clone()
            .unwrap_or_else(|| args.raw_root.join("data")),
        splits: selected_splits(&args.splits),
        options,
    }
}

pub fn run_sample(args: &SampleArgs) -> Result<Vec<SampleSummary>> {
    if args.size == 0 {
        bail!("sample size must be at least 1");
    }
    sample_splits(&args.raw_root, &selected_splits(&args.splits), args.size)
}

pub fn run_explore(args: &ExploreArgs) -> Result<()> {
    let split = Split::from(args.split);
    let span = info_span!("explore", split = %split);
    let _guard = span.enter();

    let path = args.data_dir.join(split.table_file_name());
    let frame = read_frame(&path).with_context(|| format!("read {}", path.display()))?;
    info!(path = %path.display(), rows = frame.height(), "cohort table loaded");

    let registry = schema_registry();
    let variables: Vec<&str> = registry
        .static_variables()
        .iter()
        .chain(registry.time_series_variables())
        .copied()
        .collect();
    let profiles = profile_variables(&frame, &variables).context("profile variables")?;
    print_profiles(frame.height(), &profiles);

    if let Some(variable) = &args.spread {
        let spread = median_centered_spread(&frame, variable)
            .with_context(|| format!("spread of {variable}"))?;
        print_spread(variable, &spread);
    }

    if let Some(out) = &args.missingness_out {
        let mut missingness = hourly_missingness(&frame, registry.time_series_variables())
            .context("hourly missingness")?;
        write_frame(&mut missingness, out, Default::default())
            .with_context(|| format!("write {}", out.display()))?;
        println!("Missingness: {}", out.display());
    }
    Ok(())
}
