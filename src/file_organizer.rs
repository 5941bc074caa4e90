//! Moving files whose names contain a keyword into a named folder.
//!
//! This module provides the organizer configuration, the per-file move outcome
//! types, and the `FileOrganizer` that ties the matcher to the actual moves.
//! A failing move is recorded as an outcome value and never stops the batch.

use crate::matcher;
use crate::output::OutputFormatter;
use indicatif::ProgressBar;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur during file organization operations.
#[derive(Debug)]
pub enum OrganizeError {
    /// The source directory does not exist or is not a directory.
    InvalidDirectory { path: PathBuf, reason: String },
    /// A directory could not be enumerated while searching for files.
    ReadDirectory { path: PathBuf, source: io::Error },
    /// Failed to create a target directory.
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    /// Failed to move a file to its target directory.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: io::Error,
    },
    /// A `pattern:folder` mapping without the `:` separator.
    InvalidMapping { entry: String },
    /// A path could not be made absolute.
    PathResolution { path: PathBuf, source: io::Error },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDirectory { path, reason } => {
                write!(f, "'{}' is not a valid directory: {}", path.display(), reason)
            }
            Self::ReadDirectory { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::FileMoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::InvalidMapping { entry } => {
                write!(
                    f,
                    "Invalid mapping format: {}. Use 'pattern:folder_name'",
                    entry
                )
            }
            Self::PathResolution { path, source } => {
                write!(f, "Could not resolve path {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for OrganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadDirectory { source, .. }
            | Self::DirectoryCreationFailed { source, .. }
            | Self::PathResolution { source, .. } => Some(source),
            Self::FileMoveFailure { source_error, .. } => Some(source_error),
            Self::InvalidDirectory { .. } | Self::InvalidMapping { .. } => None,
        }
    }
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Settings for one organizer instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizerConfig {
    /// Directory searched for matching files.
    pub source_dir: PathBuf,
    /// Base directory the target folders are created in.
    pub dest_dir: PathBuf,
    /// Report intended moves without touching the filesystem.
    pub dry_run: bool,
}

impl OrganizerConfig {
    /// Builds a configuration with absolute paths.
    ///
    /// `dest_dir` defaults to `source_dir`. Relative paths are resolved against
    /// the current working directory. Neither directory is required to exist.
    pub fn new(
        source_dir: impl AsRef<Path>,
        dest_dir: Option<&Path>,
        dry_run: bool,
    ) -> OrganizeResult<Self> {
        let source_dir = absolute(source_dir.as_ref())?;
        let dest_dir = match dest_dir {
            Some(dir) => absolute(dir)?,
            None => source_dir.clone(),
        };
        Ok(Self {
            source_dir,
            dest_dir,
            dry_run,
        })
    }
}

fn absolute(path: &Path) -> OrganizeResult<PathBuf> {
    std::path::absolute(path).map_err(|e| OrganizeError::PathResolution {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Why a matched file was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The file already sits at its destination.
    SamePath,
}

/// Result of handling a single matched file.
#[derive(Debug)]
pub enum MoveOutcome {
    /// The file was relocated.
    Moved { from: PathBuf, to: PathBuf },
    /// Dry run: the file would have been relocated.
    Planned { from: PathBuf, to: PathBuf },
    /// The file was not touched.
    Skipped { path: PathBuf, reason: SkipReason },
    /// The move was attempted and failed.
    Failed {
        from: PathBuf,
        to: PathBuf,
        error: OrganizeError,
    },
}

/// Everything that happened while organizing one pattern.
#[derive(Debug)]
pub struct OrganizeReport {
    /// The keyword that was searched for.
    pub pattern: String,
    /// The folder matching files were (or would be) moved into.
    pub target_dir: PathBuf,
    /// One outcome per matched file, in match order.
    pub outcomes: Vec<MoveOutcome>,
}

impl OrganizeReport {
    /// Number of files actually moved.
    pub fn moved(&self) -> usize {
        self.count(|o| matches!(o, MoveOutcome::Moved { .. }))
    }

    /// Number of moves reported in dry-run mode.
    pub fn planned(&self) -> usize {
        self.count(|o| matches!(o, MoveOutcome::Planned { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, MoveOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, MoveOutcome::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&MoveOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|&o| predicate(o)).count()
    }
}

/// Ordered pattern to folder mappings with unique patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternMappings {
    entries: Vec<(String, String)>,
}

impl PatternMappings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mapping. An existing pattern keeps its position and takes the new folder.
    pub fn insert(&mut self, pattern: impl Into<String>, folder: impl Into<String>) {
        let pattern = pattern.into();
        let folder = folder.into();
        match self.entries.iter_mut().find(|(p, _)| *p == pattern) {
            Some(entry) => entry.1 = folder,
            None => self.entries.push((pattern, folder)),
        }
    }

    /// Parses a `pattern:folder` entry, splitting at the first `:`.
    ///
    /// # Errors
    ///
    /// Returns `OrganizeError::InvalidMapping` if the entry has no `:`.
    pub fn parse_entry(entry: &str) -> OrganizeResult<(String, String)> {
        entry
            .split_once(':')
            .map(|(pattern, folder)| (pattern.to_string(), folder.to_string()))
            .ok_or_else(|| OrganizeError::InvalidMapping {
                entry: entry.to_string(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(pattern, folder)| (pattern.as_str(), folder.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<P: Into<String>, F: Into<String>> FromIterator<(P, F)> for PatternMappings {
    fn from_iter<I: IntoIterator<Item = (P, F)>>(iter: I) -> Self {
        let mut mappings = Self::new();
        for (pattern, folder) in iter {
            mappings.insert(pattern, folder);
        }
        mappings
    }
}

/// Result of applying several mappings.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Files moved per pattern. Patterns that failed structurally map to 0.
    pub counts: HashMap<String, usize>,
    /// Mappings that could not run at all.
    pub failures: Vec<(String, OrganizeError)>,
}

impl BatchSummary {
    pub fn total_moved(&self) -> usize {
        self.counts.values().sum()
    }
}

/// Finds files by name and moves them into target folders.
#[derive(Debug, Clone)]
pub struct FileOrganizer {
    config: OrganizerConfig,
}

impl FileOrganizer {
    pub fn new(config: OrganizerConfig) -> Self {
        Self { config }
    }

    pub fn source_dir(&self) -> &Path {
        &self.config.source_dir
    }

    pub fn dest_dir(&self) -> &Path {
        &self.config.dest_dir
    }

    pub fn is_dry_run(&self) -> bool {
        self.config.dry_run
    }

    /// Finds files in the source directory whose names contain `pattern`.
    ///
    /// See [`matcher::find_files_with_pattern`].
    pub fn find_files_with_pattern(
        &self,
        pattern: &str,
        recursive: bool,
    ) -> OrganizeResult<Vec<PathBuf>> {
        matcher::find_files_with_pattern(&self.config.source_dir, pattern, recursive)
    }

    /// Moves every file whose name contains `pattern` into a target folder.
    ///
    /// The target is `dest_dir/<target_folder_name>`, where the folder name
    /// defaults to the pattern. The name is used verbatim: path separators
    /// create nested folders and an absolute name replaces `dest_dir`
    /// entirely. The whole source tree is searched.
    ///
    /// Files already at their destination are skipped. In dry-run mode moves
    /// are only reported. A failed move is recorded in the report and the
    /// remaining files are still processed. An existing file at the
    /// destination is never replaced; that move fails with `AlreadyExists`.
    ///
    /// # Errors
    ///
    /// Fails before any file is touched if the target folder cannot be created
    /// or the source tree cannot be read.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use nametidy::{FileOrganizer, OrganizerConfig};
    ///
    /// let config = OrganizerConfig::new("/home/user/Downloads", None, false)?;
    /// let report = FileOrganizer::new(config).organize_files("invoice", Some("Invoices"))?;
    /// println!("Moved {} files to {}", report.moved(), report.target_dir.display());
    /// # Ok::<(), nametidy::OrganizeError>(())
    /// ```
    pub fn organize_files(
        &self,
        pattern: &str,
        target_folder_name: Option<&str>,
    ) -> OrganizeResult<OrganizeReport> {
        let folder_name = target_folder_name.unwrap_or(pattern);
        let target_dir = self.config.dest_dir.join(folder_name);

        if !self.config.dry_run && !target_dir.is_dir() {
            fs::create_dir_all(&target_dir).map_err(|e| OrganizeError::DirectoryCreationFailed {
                path: target_dir.clone(),
                source: e,
            })?;
            OutputFormatter::info(&format!("Created directory: {}", target_dir.display()));
        }

        let matching_files = self.find_files_with_pattern(pattern, true)?;

        let progress = if self.config.dry_run {
            ProgressBar::hidden()
        } else {
            OutputFormatter::create_progress_bar(matching_files.len() as u64)
        };

        let mut outcomes = Vec::with_capacity(matching_files.len());
        for file_path in matching_files {
            let outcome = self.handle_file(file_path, &target_dir);
            progress.suspend(|| report_outcome(&outcome));
            progress.inc(1);
            outcomes.push(outcome);
        }
        progress.finish_and_clear();

        Ok(OrganizeReport {
            pattern: pattern.to_string(),
            target_dir,
            outcomes,
        })
    }

    /// Applies each mapping in order and collects moved counts per pattern.
    ///
    /// Mappings are independent: one that fails to run is reported, counted
    /// as 0, and does not stop the ones after it.
    pub fn organize_multiple_patterns(&self, mappings: &PatternMappings) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for (pattern, folder) in mappings.iter() {
            match self.organize_files(pattern, Some(folder)) {
                Ok(report) => {
                    summary.counts.insert(pattern.to_string(), report.moved());
                }
                Err(e) => {
                    OutputFormatter::error(&format!("Skipping pattern '{}': {}", pattern, e));
                    summary.counts.insert(pattern.to_string(), 0);
                    summary.failures.push((pattern.to_string(), e));
                }
            }
        }

        summary
    }

    fn handle_file(&self, file_path: PathBuf, target_dir: &Path) -> MoveOutcome {
        let Some(file_name) = file_path.file_name() else {
            let error = OrganizeError::FileMoveFailure {
                source: file_path.clone(),
                destination: target_dir.to_path_buf(),
                source_error: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "file has no name component",
                ),
            };
            return MoveOutcome::Failed {
                from: file_path,
                to: target_dir.to_path_buf(),
                error,
            };
        };
        let destination = target_dir.join(file_name);

        if is_same_path(&file_path, &destination) {
            return MoveOutcome::Skipped {
                path: file_path,
                reason: SkipReason::SamePath,
            };
        }

        if self.config.dry_run {
            return MoveOutcome::Planned {
                from: file_path,
                to: destination,
            };
        }

        match move_file(&file_path, &destination) {
            Ok(()) => MoveOutcome::Moved {
                from: file_path,
                to: destination,
            },
            Err(e) => MoveOutcome::Failed {
                error: OrganizeError::FileMoveFailure {
                    source: file_path.clone(),
                    destination: destination.clone(),
                    source_error: e,
                },
                from: file_path,
                to: destination,
            },
        }
    }
}

fn report_outcome(outcome: &MoveOutcome) {
    match outcome {
        MoveOutcome::Moved { from, to } => {
            OutputFormatter::success(&format!("Moved: {} -> {}", from.display(), to.display()));
        }
        MoveOutcome::Planned { from, to } => {
            OutputFormatter::dry_run_notice(&format!(
                "Would move: {} -> {}",
                from.display(),
                to.display()
            ));
        }
        MoveOutcome::Skipped { .. } => {}
        MoveOutcome::Failed { from, error, .. } => {
            OutputFormatter::error(&format!("Error moving {}: {}", from.display(), error));
        }
    }
}

/// Compares canonical paths when both exist, absolute paths otherwise.
fn is_same_path(a: &Path, b: &Path) -> bool {
    if let (Ok(a), Ok(b)) = (fs::canonicalize(a), fs::canonicalize(b)) {
        return a == b;
    }
    match (std::path::absolute(a), std::path::absolute(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Renames `from` to `to`, copying and deleting when they are on different filesystems.
///
/// An existing entry at `to` is never replaced.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    if fs::symlink_metadata(to).is_ok() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "destination already exists",
        ));
    }
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
        Err(e) => Err(e),
    }
}
