//! nametidy - move files into folders by keywords in their names
//!
//! This library finds files whose names contain a case-insensitive keyword,
//! moves them into named folders (or only reports the moves in dry-run mode),
//! and provides the batch and interactive front ends built on top of that.

pub mod cli;
pub mod file_organizer;
pub mod interactive;
pub mod matcher;
pub mod output;

pub use file_organizer::{
    BatchSummary, FileOrganizer, MoveOutcome, OrganizeError, OrganizeReport, OrganizeResult,
    OrganizerConfig, PatternMappings, SkipReason,
};
pub use matcher::find_files_with_pattern;

pub use cli::{BatchCommand, run_batch};
pub use interactive::{InteractiveSession, SessionState, run_interactive};
