//! Batch (non-interactive) command-line front end.
//!
//! This module turns parsed command-line options into organizer runs:
//! - Source directory validation
//! - `pattern:folder` mapping parsing
//! - Running plain patterns, then mappings
//! - Printing the summary

use crate::file_organizer::{
    BatchSummary, FileOrganizer, OrganizeError, OrganizeResult, OrganizerConfig, PatternMappings,
};
use crate::output::OutputFormatter;
use std::path::{Path, PathBuf};

/// A fully parsed batch invocation.
#[derive(Debug, Clone, Default)]
pub struct BatchCommand {
    /// Directory containing the files to organize.
    pub source_dir: PathBuf,
    /// Base directory for the target folders, `source_dir` when absent.
    pub dest_dir: Option<PathBuf>,
    /// Patterns organized into a folder of the same name.
    pub patterns: Vec<String>,
    /// Raw `pattern:folder` entries.
    pub maps: Vec<String>,
    /// Only report what would be moved.
    pub dry_run: bool,
}

/// Runs a batch invocation and returns the moved counts per pattern.
///
/// `--pattern` entries run first, in order, then the valid `--map` entries.
/// Invalid mappings and patterns that fail to run are reported and skipped.
/// When neither patterns nor mappings are given, usage examples are printed
/// and the source directory is not even looked at.
///
/// # Errors
///
/// Returns an error message if the source directory is not an existing
/// directory or cannot be resolved.
///
/// # Examples
///
/// ```no_run
/// use nametidy::cli::{BatchCommand, run_batch};
///
/// let command = BatchCommand {
///     source_dir: "/home/user/Documents".into(),
///     maps: vec!["lec:Lecture_Notes".to_string()],
///     ..Default::default()
/// };
/// match run_batch(&command) {
///     Ok(summary) => println!("Moved {} files", summary.total_moved()),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_batch(command: &BatchCommand) -> Result<BatchSummary, String> {
    if command.patterns.is_empty() && command.maps.is_empty() {
        print_usage_examples();
        return Ok(BatchSummary::default());
    }

    validate_source_dir(&command.source_dir).map_err(|e| e.to_string())?;

    let config = OrganizerConfig::new(
        &command.source_dir,
        command.dest_dir.as_deref(),
        command.dry_run,
    )
    .map_err(|e| e.to_string())?;
    let organizer = FileOrganizer::new(config);

    if command.dry_run {
        OutputFormatter::dry_run_notice(&format!(
            "Analyzing contents of: {}",
            organizer.source_dir().display()
        ));
    } else {
        OutputFormatter::info(&format!(
            "Organizing contents of: {}",
            organizer.source_dir().display()
        ));
    }

    let mut summary = BatchSummary::default();

    for pattern in &command.patterns {
        match organizer.organize_files(pattern, None) {
            Ok(report) => {
                *summary.counts.entry(pattern.clone()).or_insert(0) += report.moved();
            }
            Err(e) => {
                OutputFormatter::error(&format!("Skipping pattern '{}': {}", pattern, e));
                summary.counts.entry(pattern.clone()).or_insert(0);
                summary.failures.push((pattern.clone(), e));
            }
        }
    }

    if !command.maps.is_empty() {
        let (mappings, invalid) = parse_mappings(&command.maps);
        for error in &invalid {
            OutputFormatter::error(&error.to_string());
        }

        let mapped = organizer.organize_multiple_patterns(&mappings);
        for (pattern, count) in mapped.counts {
            *summary.counts.entry(pattern).or_insert(0) += count;
        }
        summary.failures.extend(mapped.failures);
    }

    OutputFormatter::summary_table(&summary.counts, summary.total_moved());

    if command.dry_run {
        OutputFormatter::plain("");
        OutputFormatter::dry_run_notice("Dry run complete. No files were modified.");
    } else if !summary.failures.is_empty() {
        OutputFormatter::warning("Some patterns could not be organized. Please review errors above.");
    }

    Ok(summary)
}

/// Checks that `path` exists and is a directory.
///
/// # Errors
///
/// Returns `OrganizeError::InvalidDirectory` describing what is wrong.
pub fn validate_source_dir(path: &Path) -> OrganizeResult<()> {
    match path.metadata() {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(OrganizeError::InvalidDirectory {
            path: path.to_path_buf(),
            reason: "not a directory".to_string(),
        }),
        Err(e) => Err(OrganizeError::InvalidDirectory {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

/// Parses raw `--map` entries, keeping the valid ones in order.
///
/// Returns the mappings together with one `InvalidMapping` error per entry
/// that has no `:`.
pub fn parse_mappings<S: AsRef<str>>(entries: &[S]) -> (PatternMappings, Vec<OrganizeError>) {
    let mut mappings = PatternMappings::new();
    let mut invalid = Vec::new();

    for entry in entries {
        match PatternMappings::parse_entry(entry.as_ref()) {
            Ok((pattern, folder)) => mappings.insert(pattern, folder),
            Err(e) => invalid.push(e),
        }
    }

    (mappings, invalid)
}

/// Prints example invocations for when no patterns were given.
pub fn print_usage_examples() {
    OutputFormatter::plain("No patterns specified. Example usage:");
    OutputFormatter::plain("  nametidy ~/Documents --pattern lcsw --pattern lec");
    OutputFormatter::plain("  nametidy ~/Documents --map lcsw:LCSW_Files --map lec:Lecture_Notes");
    OutputFormatter::plain("\nOr run in interactive mode:");
    OutputFormatter::plain("  nametidy -i");
}
