use clap::{CommandFactory, Parser};
use nametidy::cli::{BatchCommand, run_batch};
use nametidy::interactive::run_interactive;
use nametidy::output::OutputFormatter;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(author, version, about = "Organize files based on patterns in their names")]
struct Args {
    /// Directory containing files to organize
    #[arg(value_hint = clap::ValueHint::DirPath)]
    source_dir: Option<PathBuf>,

    /// Destination base directory for organized files
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    dest_dir: Option<PathBuf>,

    /// Pattern to search for, moved into a folder of the same name (repeatable)
    #[arg(long, num_args = 1, action = clap::ArgAction::Append)]
    pattern: Vec<String>,

    /// Map a pattern to a folder name, as pattern:folder_name (repeatable)
    #[arg(long, num_args = 1, action = clap::ArgAction::Append)]
    map: Vec<String>,

    /// Show what would be done without moving files
    #[arg(long)]
    dry_run: bool,

    /// Run in interactive mode
    #[arg(short, long)]
    interactive: bool,
}

fn main() -> ExitCode {
    // No arguments at all means interactive mode.
    if std::env::args_os().len() <= 1 {
        return interactive(false);
    }

    let args = Args::parse();

    if args.interactive {
        return interactive(args.dry_run);
    }

    let Some(source_dir) = args.source_dir else {
        OutputFormatter::error("Source directory is required.");
        if let Err(e) = Args::command().print_help() {
            OutputFormatter::error(&format!("Could not print help: {}", e));
            return ExitCode::FAILURE;
        }
        return ExitCode::SUCCESS;
    };

    let command = BatchCommand {
        source_dir,
        dest_dir: args.dest_dir,
        patterns: args.pattern,
        maps: args.map,
        dry_run: args.dry_run,
    };

    match run_batch(&command) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&format!("Error: {}", e));
            ExitCode::FAILURE
        }
    }
}

fn interactive(dry_run: bool) -> ExitCode {
    match run_interactive(dry_run) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&format!("Error: {}", e));
            ExitCode::FAILURE
        }
    }
}
