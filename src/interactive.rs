//! Interactive terminal mode.
//!
//! A prompt loop for browsing to a directory, previewing the files that match
//! a keyword, and moving them after confirmation. All matching and moving is
//! delegated to [`FileOrganizer`]; this module only talks to the user.
//!
//! The session reads from any `BufRead` and writes to any `Write`, so the
//! whole dialogue can be driven from a script.

use crate::file_organizer::{FileOrganizer, MoveOutcome, OrganizeResult, OrganizerConfig};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Subfolders listed per navigation step.
const MAX_LISTED_SUBFOLDERS: usize = 15;

/// The directory being worked on and the organizer bound to it.
///
/// Changing directory builds a fresh organizer instead of mutating the old one.
#[derive(Debug, Clone)]
pub struct SessionState {
    organizer: FileOrganizer,
}

impl SessionState {
    pub fn new(dir: &Path, dry_run: bool) -> OrganizeResult<Self> {
        let dir = fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
        let config = OrganizerConfig::new(dir, None, dry_run)?;
        Ok(Self {
            organizer: FileOrganizer::new(config),
        })
    }

    pub fn current_dir(&self) -> &Path {
        self.organizer.source_dir()
    }

    pub fn organizer(&self) -> &FileOrganizer {
        &self.organizer
    }

    /// Moves the session to `dir`, rebuilding the organizer.
    pub fn change_dir(&mut self, dir: &Path) -> OrganizeResult<()> {
        *self = Self::new(dir, self.organizer.is_dry_run())?;
        Ok(())
    }
}

/// What the user chose to do after a navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Search,
    Quit,
}

/// Drives the prompt dialogue over an input and an output stream.
///
/// The dialogue, the move summary and any failed moves are written to `W`.
/// The organizer's own per-file lines and progress bar still go through
/// [`OutputFormatter`](crate::output::OutputFormatter) to stdout and stderr.
pub struct InteractiveSession<R, W> {
    input: R,
    output: W,
    dry_run: bool,
    default_dir: PathBuf,
}

impl<R: BufRead, W: Write> InteractiveSession<R, W> {
    /// Creates a session whose starting-directory prompt defaults to `~/Documents`.
    pub fn new(input: R, output: W, dry_run: bool) -> Self {
        let default_dir = dirs::home_dir()
            .map(|home| home.join("Documents"))
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            input,
            output,
            dry_run,
            default_dir,
        }
    }

    /// Overrides the directory used when the first prompt is left empty.
    pub fn with_default_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.default_dir = dir.into();
        self
    }

    /// Runs the dialogue until the user quits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        self.print_banner()?;

        let Some(start_dir) = self.prompt_start_dir()? else {
            return self.farewell();
        };
        let mut state = match SessionState::new(&start_dir, self.dry_run) {
            Ok(state) => state,
            Err(e) => {
                writeln!(self.output, "Error: {}", e)?;
                return self.farewell();
            }
        };
        writeln!(self.output, "\nNow in: {}", state.current_dir().display())?;

        if self.navigate(&mut state)? == Flow::Search {
            self.search_loop(&mut state)?;
        }
        self.farewell()
    }

    fn print_banner(&mut self) -> io::Result<()> {
        let rule = "=".repeat(60);
        writeln!(self.output, "\n{}", rule)?;
        writeln!(self.output, "NAMETIDY INTERACTIVE MODE")?;
        writeln!(
            self.output,
            "Organize files based on keywords in their names."
        )?;
        writeln!(self.output, "{}", rule)?;
        writeln!(self.output, "\nUSAGE GUIDE:")?;
        writeln!(
            self.output,
            "1. Enter a directory path to search in (or press Enter for the default)"
        )?;
        writeln!(
            self.output,
            "2. Navigate to subfolders by typing the subfolder name"
        )?;
        writeln!(
            self.output,
            "3. Use '...' to go up one level or 'search' to start searching for files"
        )?;
        writeln!(
            self.output,
            "4. Enter a keyword to search for in filenames (like 'lecture' or 'report')"
        )?;
        writeln!(self.output, "5. Choose whether to search in subfolders")?;
        writeln!(
            self.output,
            "6. Choose a name for the folder the matching files are moved to"
        )?;
        writeln!(self.output, "7. Confirm the move")?;
        if self.dry_run {
            writeln!(self.output, "\n[DRY RUN] No files will be moved.")?;
        }
        writeln!(self.output, "{}\n", rule)
    }

    fn farewell(&mut self) -> io::Result<()> {
        writeln!(self.output, "\nExiting nametidy. Goodbye!")?;
        self.output.flush()
    }

    /// Prints `message` and reads one line without its line ending.
    ///
    /// Returns `None` at end of input.
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    fn prompt_yes_no(&mut self, message: &str) -> io::Result<Option<bool>> {
        Ok(self
            .prompt(message)?
            .map(|answer| answer.trim().eq_ignore_ascii_case("y")))
    }

    fn prompt_start_dir(&mut self) -> io::Result<Option<PathBuf>> {
        loop {
            let message = format!(
                "Enter the directory path to search in (default: {}): ",
                self.default_dir.display()
            );
            let Some(answer) = self.prompt(&message)? else {
                return Ok(None);
            };

            let candidate = if answer.trim().is_empty() {
                self.default_dir.clone()
            } else {
                expand_tilde(answer.trim(), dirs::home_dir().as_deref())
            };

            if candidate.is_dir() {
                return Ok(Some(candidate));
            }
            writeln!(
                self.output,
                "Error: '{}' is not a valid directory.",
                candidate.display()
            )?;
            writeln!(
                self.output,
                "Please enter a complete path to an existing directory.\n"
            )?;
        }
    }

    fn navigate(&mut self, state: &mut SessionState) -> io::Result<Flow> {
        loop {
            writeln!(
                self.output,
                "\nCurrent directory: {}",
                state.current_dir().display()
            )?;
            self.print_subfolders(state.current_dir())?;
            writeln!(self.output, "\nNavigation options:")?;
            writeln!(
                self.output,
                "  - Type a subfolder name to navigate into it"
            )?;
            writeln!(self.output, "  - Type '...' to go up to the parent directory")?;
            writeln!(
                self.output,
                "  - Type 'search' to search for files in the current directory"
            )?;
            writeln!(self.output, "  - Type 'quit' to exit")?;

            let Some(choice) = self.prompt("\nEnter navigation choice: ")? else {
                return Ok(Flow::Quit);
            };

            match choice.to_lowercase().as_str() {
                "quit" => return Ok(Flow::Quit),
                "search" => return Ok(Flow::Search),
                "..." => match state.current_dir().parent().map(Path::to_path_buf) {
                    Some(parent) if parent.is_dir() => self.enter(state, &parent)?,
                    _ => writeln!(self.output, "Already at the root directory.")?,
                },
                _ => {
                    let candidate = state.current_dir().join(&choice);
                    if !choice.is_empty() && candidate.is_dir() {
                        self.enter(state, &candidate)?;
                    } else {
                        writeln!(
                            self.output,
                            "'{}' is not a valid subfolder in the current directory.",
                            choice
                        )?;
                    }
                }
            }
        }
    }

    fn enter(&mut self, state: &mut SessionState, dir: &Path) -> io::Result<()> {
        match state.change_dir(dir) {
            Ok(()) => writeln!(self.output, "\nNow in: {}", state.current_dir().display()),
            Err(e) => writeln!(self.output, "Error: {}", e),
        }
    }

    fn print_subfolders(&mut self, dir: &Path) -> io::Result<()> {
        writeln!(self.output, "\nAvailable subfolders:")?;
        let subfolders = match list_subfolders(dir) {
            Ok(subfolders) => subfolders,
            Err(e) => {
                return writeln!(self.output, "  - (Could not list subfolders: {})", e);
            }
        };

        if subfolders.is_empty() {
            return writeln!(self.output, "  - (No subfolders found)");
        }
        for name in subfolders.iter().take(MAX_LISTED_SUBFOLDERS) {
            writeln!(self.output, "  - {}", name)?;
        }
        if subfolders.len() > MAX_LISTED_SUBFOLDERS {
            writeln!(
                self.output,
                "  - ... and {} more",
                subfolders.len() - MAX_LISTED_SUBFOLDERS
            )?;
        }
        Ok(())
    }

    fn search_loop(&mut self, state: &mut SessionState) -> io::Result<()> {
        loop {
            writeln!(self.output, "\n{}", "-".repeat(50))?;
            let Some(pattern) = self.prompt(
                "Enter keyword to search for in filenames ('navigate' to change directory, 'quit' to exit): ",
            )?
            else {
                return Ok(());
            };

            match pattern.to_lowercase().as_str() {
                "quit" => return Ok(()),
                "navigate" => {
                    if self.navigate(state)? == Flow::Quit {
                        return Ok(());
                    }
                    continue;
                }
                _ => {}
            }

            let Some(answer) =
                self.prompt("Search in all subfolders too? (y/n, 'y' recommended for nested files): ")?
            else {
                return Ok(());
            };
            let recursive = !answer.trim().eq_ignore_ascii_case("n");

            let matching_files = match state.organizer().find_files_with_pattern(&pattern, recursive)
            {
                Ok(files) => files,
                Err(e) => {
                    writeln!(self.output, "Error: {}", e)?;
                    continue;
                }
            };

            if matching_files.is_empty() {
                writeln!(self.output, "No files found containing '{}'.", pattern)?;
                writeln!(
                    self.output,
                    "Tip: try a shorter keyword or check that you are in the right directory."
                )?;
                if !recursive {
                    writeln!(
                        self.output,
                        "Consider answering 'y' to search nested subfolders."
                    )?;
                }
                continue;
            }

            writeln!(
                self.output,
                "\nFound {} files containing '{}':",
                matching_files.len(),
                pattern
            )?;
            for (i, file_path) in matching_files.iter().enumerate() {
                writeln!(
                    self.output,
                    "  {}. {}",
                    i + 1,
                    display_match(file_path, state.current_dir(), recursive)
                )?;
            }

            let Some(folder) = self.prompt(&format!(
                "\nEnter name for the destination folder (default: '{}'): ",
                pattern
            ))?
            else {
                return Ok(());
            };
            let folder = if folder.is_empty() { pattern.clone() } else { folder };

            let Some(confirmed) = self.prompt_yes_no(&format!(
                "\nReady to move {} files to '{}' folder. Proceed? (y/n): ",
                matching_files.len(),
                folder
            ))?
            else {
                return Ok(());
            };
            if !confirmed {
                writeln!(self.output, "Operation cancelled.")?;
                continue;
            }

            match state.organizer().organize_files(&pattern, Some(&folder)) {
                Ok(report) if state.organizer().is_dry_run() => {
                    writeln!(
                        self.output,
                        "\n[DRY RUN] {} files would be moved to '{}' folder.",
                        report.planned(),
                        folder
                    )?;
                }
                Ok(report) => {
                    writeln!(
                        self.output,
                        "\nSuccessfully moved {} files to '{}' folder.",
                        report.moved(),
                        folder
                    )?;
                    writeln!(self.output, "Full path: {}", report.target_dir.display())?;
                    for outcome in &report.outcomes {
                        if let MoveOutcome::Failed { from, error, .. } = outcome {
                            writeln!(self.output, "  Could not move {}: {}", from.display(), error)?;
                        }
                    }
                }
                Err(e) => writeln!(self.output, "Error: {}", e)?,
            }

            let Some(elsewhere) =
                self.prompt_yes_no("\nWould you like to navigate to a different directory? (y/n): ")?
            else {
                return Ok(());
            };
            if elsewhere && self.navigate(state)? == Flow::Quit {
                return Ok(());
            }
        }
    }
}

/// Runs an interactive session on the process's stdin and stdout.
pub fn run_interactive(dry_run: bool) -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    InteractiveSession::new(stdin.lock(), stdout.lock(), dry_run).run()
}

/// Sorted names of the directories directly inside `dir`.
fn list_subfolders(dir: &Path) -> io::Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(dir)?
        .flatten()
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    Ok(names)
}

/// Replaces a leading `~` with the home directory, when one is known.
fn expand_tilde(input: &str, home: Option<&Path>) -> PathBuf {
    match (input, home) {
        ("~", Some(home)) => home.to_path_buf(),
        (path, Some(home)) if path.starts_with("~/") => home.join(&path[2..]),
        (path, _) => PathBuf::from(path),
    }
}

/// Relative path for recursive results, bare file name otherwise.
fn display_match(file_path: &Path, base: &Path, recursive: bool) -> String {
    let shown = if recursive {
        file_path.strip_prefix(base).unwrap_or(file_path)
    } else {
        file_path
            .file_name()
            .map(Path::new)
            .unwrap_or(file_path)
    };
    shown.display().to_string()
}
