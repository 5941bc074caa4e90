//! Output formatting and styling.
//!
//! Every user-facing line of the organizer and the command-line front end goes
//! through `OutputFormatter`, so colors and symbols stay consistent.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;

/// Colored console output for organizer runs.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nametidy::output::OutputFormatter;
    /// OutputFormatter::success("Moved: a.txt -> Reports/a.txt");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark to stderr.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nametidy::output::OutputFormatter;
    /// OutputFormatter::error("Could not move report.txt");
    /// ```
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nametidy::output::OutputFormatter;
    /// OutputFormatter::warning("Some patterns could not be organized");
    /// ```
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nametidy::output::OutputFormatter;
    /// OutputFormatter::info("Organizing contents of: /home/user/Documents");
    /// ```
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a bold heading preceded by a blank line.
    ///
    /// # Arguments
    ///
    /// * `header` - The heading text
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nametidy::output::OutputFormatter;
    /// OutputFormatter::header("Summary");
    /// ```
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates a progress bar over `total` matched files.
    ///
    /// Nothing is drawn when stderr is not a terminal.
    ///
    /// # Arguments
    ///
    /// * `total` - Number of files the bar counts up to
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nametidy::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(3);
    /// pb.inc(1);
    /// pb.finish_and_clear();
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Prints moved-file counts per pattern, sorted by pattern, with a total row.
    ///
    /// # Arguments
    ///
    /// * `pattern_counts` - Files moved per pattern
    /// * `total_files` - Sum over all patterns
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nametidy::output::OutputFormatter;
    /// use std::collections::HashMap;
    ///
    /// let mut counts = HashMap::new();
    /// counts.insert("report".to_string(), 2);
    /// counts.insert("lecture".to_string(), 5);
    /// OutputFormatter::summary_table(&counts, 7);
    /// ```
    pub fn summary_table(pattern_counts: &HashMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let mut patterns: Vec<_> = pattern_counts.iter().collect();
        patterns.sort_by_key(|&(name, _)| name);

        let max_pattern_len = patterns
            .iter()
            .map(|(name, _)| name.chars().count())
            .max()
            .unwrap_or(0)
            .max(7); // "Pattern"

        println!(
            "{:<width$} | {}",
            "Pattern".bold(),
            "Moved".bold(),
            width = max_pattern_len
        );
        println!("{}", "-".repeat(max_pattern_len + 10));

        for (pattern, count) in &patterns {
            println!(
                "{:<width$} | {} {}",
                pattern,
                count.to_string().green(),
                file_word(**count),
                width = max_pattern_len
            );
        }

        println!("{}", "-".repeat(max_pattern_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            file_word(total_files),
            width = max_pattern_len
        );
    }

    /// Prints a message with a yellow `[DRY RUN]` prefix.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nametidy::output::OutputFormatter;
    /// OutputFormatter::dry_run_notice("Dry run complete. No files were modified.");
    /// ```
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }
}

fn file_word(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
