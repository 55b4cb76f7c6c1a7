//! Command-line interface module for foldersort.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Loading the extension mapping and exclusion rules
//! - Walking the target directory one entry at a time
//! - Reporting the outcome of the run

use crate::config::{ConfigError, ExcludeFilter};
use crate::directory::{ListError, list_entries};
use crate::file_category::ExtensionMapping;
use crate::file_organizer::{FileOrganizer, Outcome, RunReport};
use crate::output::OutputFormatter;
use clap::Parser;
use indicatif::ProgressBar;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Sort the files of a directory into `files/<category>/` subfolders.
#[derive(Debug, Parser)]
#[command(name = "foldersort", version, about)]
pub struct Cli {
    /// Directory whose files should be organized
    pub path: PathBuf,

    /// Extension mapping to use instead of extensions.json next to the executable
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show where files would go without moving anything
    #[arg(long)]
    pub dry_run: bool,

    /// Glob pattern for entry names to leave in place (repeatable)
    #[arg(short, long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Print the per-entry report as JSON instead of a summary table
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log warnings and errors, show a progress bar instead of
    /// per-file lines, and print failures and the summary
    #[arg(short, long)]
    pub quiet: bool,
}

/// Options for a single run over a directory.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// If true, resolve destinations without moving anything.
    pub dry_run: bool,
    /// Glob patterns for entry names to leave in place.
    pub exclude: Vec<String>,
}

/// Errors that stop a run before any entry is organized.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    List(#[from] ListError),

    #[error("Failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),
}

/// Runs the CLI application for parsed arguments.
///
/// Configuration and listing errors are returned; per-file failures are
/// logged, counted in the report and do not make the run fail.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use foldersort::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["foldersort", "/path/to/directory", "--dry-run"]);
/// match run_cli(&cli) {
///     Ok(report) => println!("{} files would move", report.moved_count()),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(cli: &Cli) -> Result<RunReport, CliError> {
    let options = RunOptions {
        dry_run: cli.dry_run,
        exclude: cli.exclude.clone(),
    };
    let mapping = ExtensionMapping::load(cli.config.as_deref())?;
    let filter = ExcludeFilter::new(&options.exclude)?;
    let progress = if cli.quiet && !cli.json && !cli.dry_run {
        Some(ProgressBar::new(0))
    } else {
        None
    };

    if !cli.json {
        if cli.dry_run {
            OutputFormatter::dry_run_notice(&format!(
                "Analyzing contents of: {}",
                cli.path.display()
            ));
        } else {
            OutputFormatter::info(&format!("Organizing contents of: {}", cli.path.display()));
        }
    }

    let report = organize_directory(
        &cli.path,
        &mapping,
        &filter,
        options.dry_run,
        progress.as_ref(),
    )?;

    if cli.json {
        println!("{}", report_to_json(&report)?);
    } else {
        print_report(&report, cli.dry_run, cli.quiet);
    }

    Ok(report)
}

/// Loads the mapping and exclusion rules, then organizes `base_path`.
///
/// This is the library entry point equivalent to running the binary without
/// any console output.
pub fn run_with_config(
    base_path: &Path,
    config_path: Option<&Path>,
    options: &RunOptions,
) -> Result<RunReport, CliError> {
    let mapping = ExtensionMapping::load(config_path)?;
    let filter = ExcludeFilter::new(&options.exclude)?;
    Ok(organize_directory(
        base_path,
        &mapping,
        &filter,
        options.dry_run,
        None,
    )?)
}

/// Organizes every entry of `base_path`, one at a time.
///
/// This function:
/// 1. Lists the directory once
/// 2. Leaves excluded entries in place
/// 3. Organizes (or, in a dry run, plans) each remaining entry
/// 4. Records every outcome in a `RunReport`
///
/// A failure on one entry never stops the others.
///
/// # Errors
///
/// Returns `ListError` if `base_path` cannot be listed. Nothing is moved in
/// that case.
pub fn organize_directory(
    base_path: &Path,
    mapping: &ExtensionMapping,
    filter: &ExcludeFilter,
    dry_run: bool,
    progress: Option<&ProgressBar>,
) -> Result<RunReport, ListError> {
    let entries = list_entries(base_path)?;
    debug!(
        path = %base_path.display(),
        entries = entries.len(),
        categories = mapping.len(),
        "listed directory"
    );

    if let Some(pb) = progress {
        OutputFormatter::style_progress_bar(pb, entries.len() as u64);
    }

    let mut report = RunReport::new(base_path.to_path_buf());
    for name in entries {
        let outcome = if !filter.is_empty() && filter.is_excluded(&name) {
            debug!(entry = %name.to_string_lossy(), "excluded by filter");
            Outcome::Excluded
        } else if dry_run {
            FileOrganizer::plan(&name, base_path, mapping)
        } else {
            FileOrganizer::organize(&name, base_path, mapping)
        };

        if let Some(pb) = progress {
            pb.set_message(name.to_string_lossy().into_owned());
            pb.inc(1);
        }
        report.record(name, outcome);
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    if report.failed_count() > 0 {
        warn!(
            failed = report.failed_count(),
            "some files could not be organized"
        );
    } else {
        debug!(
            moved = report.moved_count(),
            dry_run, "finished organizing directory"
        );
    }

    Ok(report)
}

/// One line of the JSON report.
#[derive(Debug, Serialize)]
struct ReportEntry<'a> {
    name: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    folder: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> ReportEntry<'a> {
    fn new(name: &std::ffi::OsStr, outcome: &'a Outcome) -> Self {
        let destination = match outcome {
            Outcome::Moved { destination, .. } | Outcome::Planned { destination, .. } => {
                Some(destination.display().to_string())
            }
            _ => None,
        };
        let error = match outcome {
            Outcome::Failed(e) => Some(e.to_string()),
            _ => None,
        };
        Self {
            name: name.to_string_lossy().into_owned(),
            status: outcome.label(),
            folder: outcome.folder(),
            destination,
            error,
        }
    }
}

/// Renders a report as a pretty-printed JSON array.
pub fn report_to_json(report: &RunReport) -> Result<String, serde_json::Error> {
    let entries: Vec<_> = report
        .entries
        .iter()
        .map(|(name, outcome)| ReportEntry::new(name, outcome))
        .collect();
    serde_json::to_string_pretty(&entries)
}

/// Whether an entry gets its own line in the console report. Quiet runs
/// only list failures.
fn shows_entry(outcome: &Outcome, quiet: bool) -> bool {
    !quiet || outcome.is_failure()
}

fn print_report(report: &RunReport, dry_run: bool, quiet: bool) {
    if report.entries.is_empty() {
        OutputFormatter::plain("No files found to organize.");
        return;
    }

    for (name, outcome) in &report.entries {
        if !shows_entry(outcome, quiet) {
            continue;
        }
        let name = name.to_string_lossy();
        match outcome {
            Outcome::Moved { folder, .. } => {
                OutputFormatter::success(&format!("{} → files/{}/", name, folder))
            }
            Outcome::Planned { folder, .. } => {
                OutputFormatter::plain(&format!(" - {} → would move to files/{}/", name, folder))
            }
            Outcome::Failed(e) => OutputFormatter::error(&format!("{}: {}", name, e)),
            Outcome::SkippedDirectory | Outcome::Absent | Outcome::Excluded => {}
        }
    }

    OutputFormatter::summary_table(&report.folder_counts(), report.moved_count());

    if dry_run {
        OutputFormatter::dry_run_notice("Dry run complete. No files were modified.");
    } else if report.failed_count() > 0 {
        OutputFormatter::warning(&format!(
            "{} file(s) could not be organized. Please review errors above.",
            report.failed_count()
        ));
    } else {
        OutputFormatter::success("Organization complete!");
    }
}
