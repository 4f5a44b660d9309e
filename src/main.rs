//! tabprof: Tabular Data Profiling CLI Tool
//!
//! Loads a CSV, Excel or Parquet file and prints an exploratory profile of
//! it, optionally applying cleaning actions and exporting a report.

use std::path::Path;

use anyhow::Result;
use clap::Parser;

use tabprof::cli::{confirm_cleaning, CleanArgs, Cli, Commands};
use tabprof::logging::init_logging;
use tabprof::pipeline::{
    analysis_view, analyze_column, compare_numeric_by_category, load_dataset_with_progress,
    Session,
};
use tabprof::report::{
    build_profile_report, cleaned_output_path, display_crosstab, display_distribution,
    display_report, display_view_note, export_report, save_dataset, ProfileReport,
    ReportSettings,
};
use tabprof::utils::{
    create_spinner, finish_with_success, print_banner, print_completion, print_config,
    print_info, print_section_header, print_success, print_warning,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let input = cli.input.clone().ok_or_else(|| {
        anyhow::anyhow!("Input file is required. Use -i/--input to specify a file.")
    })?;

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&input, cli.high_missing_pct, cli.correlation_threshold);

    let (dataset, rows, cols, memory_mb) =
        load_dataset_with_progress(&input, cli.infer_schema_length)?;
    print_success(&format!(
        "Loaded {} ({} rows x {} columns, {:.2} MB)",
        dataset.source, rows, cols, memory_mb
    ));
    let mut session = Session::from_dataset(dataset);

    let settings = ReportSettings {
        high_missing_pct: cli.high_missing_pct,
        correlation_threshold: cli.correlation_threshold,
        preview_rows: cli.preview_rows,
    };

    match cli.command() {
        Commands::Profile => {
            let report = build_profile_report(&session, &settings)?;
            display_report(&report);
            if let Some(path) = &cli.report {
                export(&report, path)?;
            }
        }
        Commands::Distribution { column, unique_key } => {
            let outcome = analysis_view(session.table(), unique_key.as_deref()).and_then(|view| {
                display_view_note(&view);
                analyze_column(&view.df, &column)
            });
            if let Some(distribution) = recover(outcome)? {
                display_distribution(&column, &distribution);
            }
        }
        Commands::Compare {
            numeric,
            categorical,
            unique_key,
        } => {
            let outcome = analysis_view(session.table(), unique_key.as_deref()).and_then(|view| {
                display_view_note(&view);
                compare_numeric_by_category(&view.df, &numeric, &categorical, cli.top_categories)
            });
            if let Some(crosstab) = recover(outcome)? {
                display_crosstab(&crosstab);
            }
        }
        Commands::Clean(args) => {
            run_clean(&cli, &args, &input, &mut session)?;
            if let Some(path) = &cli.report {
                let report = build_profile_report(&session, &settings)?;
                export(&report, path)?;
            }
        }
    }

    print_completion();
    Ok(())
}

/// Show a user-facing error as a warning and carry on; propagate the rest
fn recover<T>(result: tabprof::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_user_facing() => {
            tracing::warn!(error = %e, "analysis skipped");
            print_warning(&e.to_string());
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn export(report: &ProfileReport, path: &Path) -> Result<()> {
    let spinner = create_spinner(&format!("Exporting report to {}...", path.display()));
    export_report(report, path)?;
    finish_with_success(&spinner, &format!("Report saved to {}", path.display()));
    Ok(())
}

fn run_clean(cli: &Cli, args: &CleanArgs, input: &Path, session: &mut Session) -> Result<()> {
    print_section_header("CLEANING");

    if args.is_empty() {
        print_warning("No cleaning actions requested. Use --drop-duplicates, --fill or --drop-column.");
        return Ok(());
    }

    let mut planned = Vec::new();
    if args.drop_duplicates {
        planned.push("remove duplicate rows".to_string());
    }
    if let (Some(column), Some(strategy)) = (&args.fill, args.strategy) {
        planned.push(format!("{} in '{}'", strategy, column));
    }
    for column in &args.drop_columns {
        planned.push(format!("drop column '{}'", column));
    }

    if !cli.no_confirm && !confirm_cleaning(&planned)? {
        print_info("Cleaning cancelled");
        return Ok(());
    }

    if args.drop_duplicates {
        report_action(session.drop_duplicates())?;
    }
    if let (Some(column), Some(strategy)) = (&args.fill, args.strategy) {
        report_action(session.handle_missing(column, strategy))?;
    }
    for column in &args.drop_columns {
        report_action(session.drop_column(column))?;
    }

    if session.version() == 0 {
        print_info("No changes applied; nothing saved");
        return Ok(());
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| cleaned_output_path(input));
    let mut df = session.table().clone();
    save_dataset(&mut df, &output)?;
    print_success(&format!(
        "Saved cleaned table ({} rows x {} columns) to {}",
        df.height(),
        df.width(),
        output.display()
    ));

    Ok(())
}

fn report_action(result: tabprof::Result<String>) -> Result<()> {
    if let Some(message) = recover(result)? {
        print_success(&message);
    }
    Ok(())
}
