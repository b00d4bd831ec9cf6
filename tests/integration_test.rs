use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use backup_buddy::{
    builder, mirror, Copier, CopyOutcome, ErrorKind, FsCopier, MirrorError, Mode,
};
use filetime::{set_file_mtime, FileTime};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Create a source tree and an empty destination side by side.
///
/// Structure:
/// ```
/// tmp/
///   srcDock/
///     notes.txt
///     todo.md
///     a/
///       b/
///         file.txt
///     sub/
///       deep.txt
///   destDock/
/// ```
fn setup_docks() -> (tempfile::TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("srcDock");
    let dst = dir.path().join("destDock");

    fs::create_dir_all(src.join("a/b")).unwrap();
    fs::create_dir_all(src.join("sub")).unwrap();
    fs::create_dir(&dst).unwrap();

    fs::write(src.join("notes.txt"), "notes").unwrap();
    fs::write(src.join("todo.md"), "todo").unwrap();
    fs::write(src.join("a/b/file.txt"), "nested").unwrap();
    fs::write(src.join("sub/deep.txt"), "deep").unwrap();

    (dir, src, dst)
}

fn set_mtime(path: &Path, secs: i64) {
    set_file_mtime(path, FileTime::from_unix_time(secs, 0)).unwrap();
}

/// Relative paths of every file under `root`, sorted.
fn files_under(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
        .collect();
    files.sort();
    files
}

/// Fails every copy whose file name is in the list, delegates the rest.
struct FailingCopier(Vec<&'static str>);

impl Copier for FailingCopier {
    fn copy(&self, source: &Path, destination: &Path) -> Result<CopyOutcome, MirrorError> {
        let name = source.file_name().unwrap().to_string_lossy();
        if self.0.iter().any(|n| *n == name) {
            return Err(MirrorError::PermissionDenied(destination.to_path_buf()));
        }
        FsCopier.copy(source, destination)
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn single_mode_updates_stale_file() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("srcDock");
    let dst = dir.path().join("destDock");
    fs::create_dir(&src).unwrap();
    fs::create_dir(&dst).unwrap();

    fs::write(src.join("notes.txt"), "new").unwrap();
    fs::write(dst.join("notes.txt"), "old").unwrap();
    set_mtime(&src.join("notes.txt"), 100);
    set_mtime(&dst.join("notes.txt"), 50);

    let report = mirror(&src, &dst, Mode::Single).unwrap();

    assert_eq!(report.files_copied, 1);
    assert_eq!(report.files_updated, 1);
    assert_eq!(report.files_skipped, 0);
    assert!(report.errors.is_empty());
    assert_eq!(fs::read_to_string(dst.join("notes.txt")).unwrap(), "new");
}

#[test]
fn recursive_mode_creates_subdirectory_then_copies() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("srcDock");
    let dst = dir.path().join("destDock");
    fs::create_dir_all(src.join("sub")).unwrap();
    fs::create_dir(&dst).unwrap();
    fs::write(src.join("sub/deep.txt"), "deep").unwrap();

    let report = mirror(&src, &dst, Mode::Recursive).unwrap();

    assert_eq!(report.dirs_created, 1);
    assert_eq!(report.files_copied, 1);
    assert!(report.is_clean());
    assert!(dst.join("sub").is_dir());
    assert_eq!(fs::read_to_string(dst.join("sub/deep.txt")).unwrap(), "deep");
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn second_run_copies_nothing() {
    let (_dir, src, dst) = setup_docks();

    let first = mirror(&src, &dst, Mode::Recursive).unwrap();
    assert_eq!(first.files_copied, 4);

    let second = mirror(&src, &dst, Mode::Recursive).unwrap();
    assert_eq!(second.files_copied, 0, "nothing changed between runs");
    assert_eq!(second.files_skipped, 4);
    assert_eq!(second.dirs_created, 0);
    assert!(second.is_clean());
}

#[test]
fn copies_only_when_source_is_strictly_newer() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    let dst = dir.path().join("dst");
    fs::create_dir(&src).unwrap();
    fs::create_dir(&dst).unwrap();

    // (name, source mtime, destination mtime, expect copy)
    let cases = [
        ("newer.txt", 200, 100, true),
        ("equal.txt", 100, 100, false),
        ("older.txt", 100, 200, false),
    ];
    for (name, s, d, _) in cases {
        fs::write(src.join(name), "source").unwrap();
        fs::write(dst.join(name), "dest").unwrap();
        set_mtime(&src.join(name), s);
        set_mtime(&dst.join(name), d);
    }

    let report = mirror(&src, &dst, Mode::Single).unwrap();

    assert_eq!(report.files_copied, 1);
    assert_eq!(report.files_skipped, 2);
    for (name, _, _, expect_copy) in cases {
        let content = fs::read_to_string(dst.join(name)).unwrap();
        let expected = if expect_copy { "source" } else { "dest" };
        assert_eq!(content, expected, "{name}");
    }
}

#[test]
fn missing_destination_is_always_copied() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    let dst = dir.path().join("dst");
    fs::create_dir(&src).unwrap();
    fs::write(src.join("ancient.txt"), "old but missing").unwrap();
    set_mtime(&src.join("ancient.txt"), 1);

    let report = mirror(&src, &dst, Mode::Single).unwrap();

    assert_eq!(report.files_copied, 1);
    assert_eq!(report.files_updated, 0);
    assert!(dst.join("ancient.txt").is_file());
}

#[test]
fn recursive_mode_preserves_structure() {
    let (_dir, src, dst) = setup_docks();

    mirror(&src, &dst, Mode::Recursive).unwrap();

    assert_eq!(
        files_under(&dst),
        vec![
            PathBuf::from("a/b/file.txt"),
            PathBuf::from("notes.txt"),
            PathBuf::from("sub/deep.txt"),
            PathBuf::from("todo.md"),
        ]
    );
    assert!(!dst.join("file.txt").exists());
    assert!(!dst.join("b/file.txt").exists());
}

#[test]
fn repeated_root_name_inside_tree_keeps_nesting() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("srcDock");
    let dst = dir.path().join("destDock");
    fs::create_dir_all(src.join("x/srcDock/y")).unwrap();
    fs::write(src.join("x/srcDock/y/f.txt"), "f").unwrap();

    mirror(&src, &dst, Mode::Recursive).unwrap();

    assert_eq!(files_under(&dst), vec![PathBuf::from("x/srcDock/y/f.txt")]);
}

#[test]
fn single_mode_leaves_subdirectories_alone() {
    let (_dir, src, dst) = setup_docks();

    let report = mirror(&src, &dst, Mode::Single).unwrap();

    assert_eq!(report.files_copied, 2);
    assert_eq!(report.dirs_created, 0);
    assert_eq!(
        files_under(&dst),
        vec![PathBuf::from("notes.txt"), PathBuf::from("todo.md")]
    );
    assert!(!dst.join("sub").exists());
    assert!(!dst.join("a").exists());
}

#[test]
fn one_failing_file_does_not_stop_the_run() {
    let (_dir, src, dst) = setup_docks();

    let report = builder(&src, &dst)
        .copier(FailingCopier(vec!["notes.txt"]))
        .run()
        .unwrap();

    assert_eq!(report.files_copied, 3);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].kind(), ErrorKind::PermissionDenied);
    assert!(report.errors[0].path().unwrap().ends_with("notes.txt"));
    assert!(!report.is_clean());
    assert!(!dst.join("notes.txt").exists());
    assert!(dst.join("sub/deep.txt").is_file());
}

#[test]
fn failed_directory_still_attempts_its_files() {
    let (_dir, src, dst) = setup_docks();
    // A plain file where the `sub` directory should go.
    fs::write(dst.join("sub"), "in the way").unwrap();

    let report = mirror(&src, &dst, Mode::Recursive).unwrap();

    let kinds: Vec<ErrorKind> = report.error_kinds().map(|(_, k)| k).collect();
    assert_eq!(kinds.len(), 2, "{kinds:?}");
    assert_eq!(kinds[0], ErrorKind::DirectoryCreation);
    assert!(report.errors[1].path().unwrap().ends_with("sub/deep.txt"));
    assert_eq!(report.files_copied, 3);
}

// ---------------------------------------------------------------------------
// Roots
// ---------------------------------------------------------------------------

#[test]
fn missing_source_aborts_without_touching_destination() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("nope");
    let dst = dir.path().join("dst");

    let err = mirror(&src, &dst, Mode::Recursive).unwrap_err();

    assert!(matches!(err, MirrorError::SourceUnavailable(_)));
    assert!(!err.is_recoverable());
    assert!(!dst.exists());
}

#[test]
fn source_that_is_a_file_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("file.txt");
    fs::write(&src, "x").unwrap();

    let err = mirror(&src, dir.path().join("dst"), Mode::Single).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SourceUnavailable);
}

#[test]
fn missing_destination_root_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    let dst = dir.path().join("backups/today");
    fs::create_dir(&src).unwrap();
    fs::write(src.join("a.txt"), "a").unwrap();

    let report = mirror(&src, &dst, Mode::Recursive).unwrap();

    assert_eq!(report.dirs_created, 0, "the root itself is not counted");
    assert!(dst.join("a.txt").is_file());
}

#[test]
fn destination_inside_source_is_not_walked() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(src.join("docs")).unwrap();
    fs::write(src.join("docs/readme.txt"), "r").unwrap();
    let dst = src.join("backup");

    let first = mirror(&src, &dst, Mode::Recursive).unwrap();
    let second = mirror(&src, &dst, Mode::Recursive).unwrap();

    assert_eq!(first.files_copied, 1);
    assert_eq!(second.files_copied, 0);
    assert_eq!(files_under(&dst), vec![PathBuf::from("docs/readme.txt")]);
}

// ---------------------------------------------------------------------------
// Builder options
// ---------------------------------------------------------------------------

#[test]
fn collect_paths_records_destinations() {
    let (_dir, src, dst) = setup_docks();

    let report = builder(&src, &dst)
        .recursive(false)
        .collect_paths(true)
        .run()
        .unwrap();

    assert_eq!(report.copied_paths.len(), 2);
    assert!(report.copied_paths.iter().all(|p| p.parent() == Some(dst.canonicalize().unwrap().as_path())));
}

#[test]
fn paths_empty_when_not_collecting() {
    let (_dir, src, dst) = setup_docks();

    let report = mirror(&src, &dst, Mode::Recursive).unwrap();

    assert!(report.copied_paths.is_empty());
    assert_eq!(report.files_copied, 4, "copies are still counted");
}

#[test]
fn raised_cancel_flag_stops_before_copying() {
    let (_dir, src, dst) = setup_docks();

    let report = builder(&src, &dst)
        .cancel_flag(Arc::new(AtomicBool::new(true)))
        .run()
        .unwrap();

    assert!(report.interrupted);
    assert!(!report.is_clean());
    assert_eq!(report.files_copied, 0);
    assert!(files_under(&dst).is_empty());
}

#[test]
fn stats_are_populated() {
    let (_dir, src, dst) = setup_docks();

    let report = mirror(&src, &dst, Mode::Recursive).unwrap();

    assert_eq!(report.stats.files_seen, 4);
    // root, a, a/b, sub
    assert_eq!(report.stats.dirs_visited, 4);
}

#[cfg(unix)]
#[test]
fn symlink_back_to_ancestor_is_not_followed() {
    let (_dir, src, dst) = setup_docks();
    std::os::unix::fs::symlink(&src, src.join("a/loop")).unwrap();

    let report = mirror(&src, &dst, Mode::Recursive).unwrap();

    assert_eq!(report.files_copied, 4);
    assert!(report
        .errors
        .iter()
        .any(|e| e.kind() == ErrorKind::SymlinkLoop));
    assert!(!dst.join("a/loop/notes.txt").exists());
}
