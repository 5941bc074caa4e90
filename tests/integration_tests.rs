//! Integration tests for nametidy
//!
//! These tests run the library the way the command-line front end does,
//! against real temporary directory trees.
//!
//! Test categories:
//! 1. Finding files
//! 2. Live organization
//! 3. Dry-run mode
//! 4. Batch mappings
//! 5. Edge cases and error scenarios

use nametidy::cli::{BatchCommand, parse_mappings, run_batch};
use nametidy::{FileOrganizer, MoveOutcome, OrganizerConfig, find_files_with_pattern};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A temporary directory with helpers for building file trees.
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        TestFixture { temp_dir }
    }

    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a file (and its parent directories) with text content.
    fn create_text_file(&self, rel_path: &str, content: &str) {
        let file_path = self.path().join(rel_path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        let mut file = File::create(&file_path).expect("Failed to create file");
        file.write_all(content.as_bytes())
            .expect("Failed to write file content");
    }

    fn create_subdir(&self, rel_path: &str) {
        fs::create_dir_all(self.path().join(rel_path)).expect("Failed to create subdirectory");
    }

    fn organizer(&self, dry_run: bool) -> FileOrganizer {
        FileOrganizer::new(
            OrganizerConfig::new(self.path(), None, dry_run).expect("Failed to build config"),
        )
    }

    fn assert_dir_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_dir(), "Directory should exist: {}", path.display());
    }

    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_file(), "File should exist: {}", path.display());
    }

    fn assert_file_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "File should not exist: {}", path.display());
    }

    fn read(&self, rel_path: &str) -> String {
        fs::read_to_string(self.path().join(rel_path)).expect("Failed to read file")
    }

    /// All files under the fixture, relative and sorted.
    fn list_files_recursive(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        Self::walk_dir(self.path(), &mut files);
        let mut relative: Vec<PathBuf> = files
            .into_iter()
            .map(|p| p.strip_prefix(self.path()).unwrap().to_path_buf())
            .collect();
        relative.sort();
        relative
    }

    fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) {
        if let Ok(entries) = fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_file() {
                    files.push(path);
                } else if path.is_dir() {
                    Self::walk_dir(&path, files);
                }
            }
        }
    }

    /// The three-file setup used by most scenarios.
    fn with_reports() -> Self {
        let fixture = Self::new();
        fixture.create_text_file("report_jan.txt", "january");
        fixture.create_text_file("report_feb.txt", "february");
        fixture.create_text_file("notes.txt", "notes");
        fixture
    }
}

fn sorted_names(paths: &[PathBuf]) -> Vec<String> {
    let mut names: Vec<String> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

// ============================================================================
// Test Suite 1: Finding Files
// ============================================================================

#[test]
fn test_find_recursive_returns_only_matching_files_at_every_depth() {
    let fixture = TestFixture::new();
    fixture.create_text_file("Lecture_01.pdf", "");
    fixture.create_text_file("week1/lecture_02.pdf", "");
    fixture.create_text_file("week1/extra/deep/LECTURE_03.pdf", "");
    fixture.create_text_file("week1/homework.pdf", "");
    fixture.create_subdir("lecture_archive");

    let found = find_files_with_pattern(fixture.path(), "lecture", true).unwrap();

    assert_eq!(
        sorted_names(&found),
        vec!["LECTURE_03.pdf", "Lecture_01.pdf", "lecture_02.pdf"]
    );
    for path in &found {
        assert!(path.is_absolute());
        assert!(path.is_file());
    }
}

#[test]
fn test_find_empty_pattern_non_recursive_lists_direct_files() {
    let fixture = TestFixture::new();
    fixture.create_text_file("a.txt", "");
    fixture.create_text_file("b.md", "");
    fixture.create_text_file("nested/c.txt", "");

    let found = find_files_with_pattern(fixture.path(), "", false).unwrap();

    assert_eq!(sorted_names(&found), vec!["a.txt", "b.md"]);
}

#[test]
fn test_find_does_not_mutate_anything() {
    let fixture = TestFixture::with_reports();
    let before = fixture.list_files_recursive();

    fixture.organizer(false).find_files_with_pattern("report", true).unwrap();

    assert_eq!(fixture.list_files_recursive(), before);
}

// ============================================================================
// Test Suite 2: Live Organization
// ============================================================================

#[test]
fn test_organize_reports_scenario() {
    let fixture = TestFixture::with_reports();

    let report = fixture
        .organizer(false)
        .organize_files("report", Some("Reports"))
        .unwrap();

    assert_eq!(report.moved(), 2);
    fixture.assert_dir_exists("Reports");
    fixture.assert_file_exists("Reports/report_jan.txt");
    fixture.assert_file_exists("Reports/report_feb.txt");
    fixture.assert_file_exists("notes.txt");
    fixture.assert_file_not_exists("report_jan.txt");
    fixture.assert_file_not_exists("report_feb.txt");
}

#[test]
fn test_moved_count_matches_relocated_files_with_same_content() {
    let fixture = TestFixture::new();
    fixture.create_text_file("inv_1.txt", "one");
    fixture.create_text_file("a/inv_2.txt", "two");
    fixture.create_text_file("a/b/INV_3.txt", "three");

    let report = fixture
        .organizer(false)
        .organize_files("inv_", Some("Invoices"))
        .unwrap();

    let mut relocated = 0;
    for outcome in &report.outcomes {
        if let MoveOutcome::Moved { from, to } = outcome {
            assert!(!from.exists());
            assert!(to.is_file());
            relocated += 1;
        }
    }
    assert_eq!(report.moved(), 3);
    assert_eq!(relocated, 3);
    assert_eq!(fixture.read("Invoices/inv_1.txt"), "one");
    assert_eq!(fixture.read("Invoices/inv_2.txt"), "two");
    assert_eq!(fixture.read("Invoices/INV_3.txt"), "three");
}

#[test]
fn test_organize_into_separate_destination() {
    let fixture = TestFixture::with_reports();
    let dest = TempDir::new().expect("Failed to create temp directory");
    let config = OrganizerConfig::new(fixture.path(), Some(dest.path()), false).unwrap();

    let report = FileOrganizer::new(config)
        .organize_files("report", None)
        .unwrap();

    assert_eq!(report.moved(), 2);
    assert!(dest.path().join("report/report_jan.txt").is_file());
    assert!(dest.path().join("report/report_feb.txt").is_file());
    fixture.assert_file_not_exists("report");
}

#[test]
fn test_second_run_skips_files_already_in_place() {
    let fixture = TestFixture::with_reports();
    let organizer = fixture.organizer(false);

    let first = organizer.organize_files("report", Some("Reports")).unwrap();
    let second = organizer.organize_files("report", Some("Reports")).unwrap();

    assert_eq!(first.moved(), 2);
    assert_eq!(second.moved(), 0);
    assert_eq!(second.skipped(), 2);
    assert_eq!(fixture.read("Reports/report_jan.txt"), "january");
    assert_eq!(fixture.list_files_recursive().len(), 3);
}

#[test]
fn test_nested_target_folder_name_is_used_verbatim() {
    let fixture = TestFixture::with_reports();

    let report = fixture
        .organizer(false)
        .organize_files("report", Some("archive/2024"))
        .unwrap();

    assert_eq!(report.moved(), 2);
    fixture.assert_file_exists("archive/2024/report_jan.txt");
}

// ============================================================================
// Test Suite 3: Dry-Run Mode
// ============================================================================

#[test]
fn test_dry_run_reports_scenario() {
    let fixture = TestFixture::with_reports();

    let report = fixture
        .organizer(true)
        .organize_files("report", Some("Reports"))
        .unwrap();

    assert_eq!(report.moved(), 0);
    assert_eq!(report.planned(), 2);
    fixture.assert_file_exists("report_jan.txt");
    fixture.assert_file_exists("report_feb.txt");
    fixture.assert_file_exists("notes.txt");
    fixture.assert_file_not_exists("Reports");
}

#[test]
fn test_dry_run_twice_is_identical_and_non_mutating() {
    let fixture = TestFixture::with_reports();
    let organizer = fixture.organizer(true);
    let before = fixture.list_files_recursive();

    let planned = |report: &nametidy::OrganizeReport| -> Vec<(PathBuf, PathBuf)> {
        let mut moves: Vec<_> = report
            .outcomes
            .iter()
            .filter_map(|o| match o {
                MoveOutcome::Planned { from, to } => Some((from.clone(), to.clone())),
                _ => None,
            })
            .collect();
        moves.sort();
        moves
    };

    let first = organizer.organize_files("report", Some("Reports")).unwrap();
    let second = organizer.organize_files("report", Some("Reports")).unwrap();

    assert_eq!(planned(&first), planned(&second));
    assert_eq!(planned(&first).len(), 2);
    assert_eq!(fixture.list_files_recursive(), before);
}

#[test]
fn test_dry_run_batch_leaves_tree_untouched() {
    let fixture = TestFixture::with_reports();
    let before = fixture.list_files_recursive();
    let command = BatchCommand {
        source_dir: fixture.path().to_path_buf(),
        patterns: vec!["notes".to_string()],
        maps: vec!["report:Reports".to_string()],
        dry_run: true,
        ..Default::default()
    };

    let summary = run_batch(&command).unwrap();

    assert_eq!(summary.total_moved(), 0);
    assert_eq!(fixture.list_files_recursive(), before);
    fixture.assert_file_not_exists("Reports");
    fixture.assert_file_not_exists("notes");
}

// ============================================================================
// Test Suite 4: Batch Mappings
// ============================================================================

#[test]
fn test_batch_runs_patterns_and_maps() {
    let fixture = TestFixture::new();
    fixture.create_text_file("lcsw_intro.txt", "");
    fixture.create_text_file("lec_1.txt", "");
    fixture.create_text_file("lec_2.txt", "");
    let command = BatchCommand {
        source_dir: fixture.path().to_path_buf(),
        patterns: vec!["lcsw".to_string()],
        maps: vec!["lec_:Lecture_Notes".to_string()],
        ..Default::default()
    };

    let summary = run_batch(&command).unwrap();

    assert_eq!(summary.counts.get("lcsw"), Some(&1));
    assert_eq!(summary.counts.get("lec_"), Some(&2));
    fixture.assert_file_exists("lcsw/lcsw_intro.txt");
    fixture.assert_file_exists("Lecture_Notes/lec_1.txt");
    fixture.assert_file_exists("Lecture_Notes/lec_2.txt");
}

#[test]
fn test_malformed_mapping_does_not_block_others() {
    let fixture = TestFixture::new();
    fixture.create_text_file("a_file.txt", "");
    fixture.create_text_file("b_file.txt", "");
    let command = BatchCommand {
        source_dir: fixture.path().to_path_buf(),
        maps: vec![
            "a_:FolderA".to_string(),
            "malformed".to_string(),
            "b_:FolderB".to_string(),
        ],
        ..Default::default()
    };

    let summary = run_batch(&command).unwrap();

    assert_eq!(summary.counts.get("a_"), Some(&1));
    assert_eq!(summary.counts.get("b_"), Some(&1));
    assert!(!summary.counts.contains_key("malformed"));
    fixture.assert_file_exists("FolderA/a_file.txt");
    fixture.assert_file_exists("FolderB/b_file.txt");
}

#[test]
fn test_mapping_with_extra_colons_keeps_rest_as_folder() {
    let (mappings, invalid) = parse_mappings(&["a:FolderA", "bad:mapping::x"]);

    assert!(invalid.is_empty());
    let entries: Vec<_> = mappings.iter().collect();
    assert_eq!(entries, vec![("a", "FolderA"), ("bad", "mapping::x")]);
}

#[test]
fn test_empty_mapping_result_does_not_stop_next() {
    let fixture = TestFixture::new();
    fixture.create_text_file("keep_me.txt", "");
    let (mappings, _) = parse_mappings(&["nothing:Empty", "keep:Kept"]);

    let summary = fixture.organizer(false).organize_multiple_patterns(&mappings);

    assert_eq!(summary.counts.get("nothing"), Some(&0));
    assert_eq!(summary.counts.get("keep"), Some(&1));
    assert!(summary.failures.is_empty());
    fixture.assert_dir_exists("Empty");
    fixture.assert_file_exists("Kept/keep_me.txt");
}

// ============================================================================
// Test Suite 5: Edge Cases and Error Scenarios
// ============================================================================

#[test]
fn test_batch_with_missing_source_is_an_error() {
    let fixture = TestFixture::new();
    let command = BatchCommand {
        source_dir: fixture.path().join("does_not_exist"),
        patterns: vec!["x".to_string()],
        ..Default::default()
    };

    let result = run_batch(&command);

    assert!(result.is_err());
    assert!(result.unwrap_err().contains("not a valid directory"));
    fixture.assert_file_not_exists("does_not_exist");
}

#[test]
fn test_blocked_destination_fails_only_that_file() {
    let fixture = TestFixture::with_reports();
    fixture.create_text_file("Reports/report_jan.txt/blocker", "");

    let report = fixture
        .organizer(false)
        .organize_files("report", Some("Reports"))
        .unwrap();

    assert_eq!(report.failed(), 1);
    assert_eq!(report.moved(), 1);
    fixture.assert_file_exists("report_jan.txt");
    fixture.assert_file_exists("Reports/report_feb.txt");
}

#[test]
fn test_special_characters_in_names() {
    let fixture = TestFixture::new();
    fixture.create_text_file("Résumé final (v2).txt", "cv");
    fixture.create_text_file("résumé draft.txt", "draft");

    let report = fixture
        .organizer(false)
        .organize_files("RÉSUMÉ", Some("CV"))
        .unwrap();

    assert_eq!(report.moved(), 2);
    fixture.assert_file_exists("CV/Résumé final (v2).txt");
    fixture.assert_file_exists("CV/résumé draft.txt");
}

#[test]
fn test_no_matches_still_creates_target_in_live_mode() {
    let fixture = TestFixture::with_reports();

    let report = fixture
        .organizer(false)
        .organize_files("zzz", Some("Nothing"))
        .unwrap();

    assert_eq!(report.moved(), 0);
    assert!(report.outcomes.is_empty());
    fixture.assert_dir_exists("Nothing");
}
