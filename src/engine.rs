use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use ignore::WalkBuilder;

use crate::classify;
use crate::copy::CopyOutcome;
use crate::ensure::{ensure, EnsureOutcome};
use crate::entry::{DirectoryEntry, EntryKind, FileEntry, MirrorTask};
use crate::error::MirrorError;
use crate::rebase::TraversalContext;
use crate::results::MirrorReport;
use crate::staleness;
use crate::traits::Copier;

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// How much of the source tree a run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Only the files directly inside the source root.
    Single,

    /// The whole subtree, recreating nested directories.
    #[default]
    Recursive,
}

impl FromStr for Mode {
    type Err = MirrorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "s" | "single" => Ok(Self::Single),
            "r" | "recursive" => Ok(Self::Recursive),
            _ => Err(MirrorError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => f.write_str("single"),
            Self::Recursive => f.write_str("recursive"),
        }
    }
}

// ---------------------------------------------------------------------------
// Engine options
// ---------------------------------------------------------------------------

/// Internal options passed from the builder to `run()`.
pub(crate) struct EngineOptions {
    pub context:       TraversalContext,
    pub mode:          Mode,
    pub copier:        Box<dyn Copier>,
    pub collect_paths: bool,
    pub cancel:        Arc<AtomicBool>,
}

// ---------------------------------------------------------------------------
// run()
// ---------------------------------------------------------------------------

/// Mirror the source root onto the destination root.
///
/// Fails only when the source root is unusable, the destination root cannot
/// be created, or the walker reports something that is not tied to a single
/// entry. Everything else lands in [`MirrorReport::errors`].
pub(crate) fn run(opts: EngineOptions) -> Result<MirrorReport, MirrorError> {
    let start = Instant::now();
    let EngineOptions {
        context,
        mode,
        copier,
        collect_paths,
        cancel,
    } = opts;

    let mut context = prepare_roots(context)?;
    let mut report = MirrorReport::default();

    tracing::info!(
        source = %context.source_root.display(),
        destination = %context.destination_root.display(),
        %mode,
        "starting mirror"
    );

    let mut builder = WalkBuilder::new(&context.source_root);
    builder
        .standard_filters(false)
        .ignore(false)
        .parents(false)
        .hidden(false)
        .follow_links(true)
        .same_file_system(false)
        .sort_by_file_name(|a, b| a.cmp(b));

    if mode == Mode::Single {
        builder.max_depth(Some(1));
    }

    // Never walk into our own output when the destination sits inside the source.
    let destination_root = context.destination_root.clone();
    builder.filter_entry(move |e| e.path() != destination_root);

    let mut current_dir = context.source_root.clone();

    for res in builder.build() {
        if cancel.load(Ordering::Relaxed) {
            tracing::warn!("interrupted, stopping traversal");
            report.interrupted = true;
            break;
        }

        let entry = match res {
            Ok(e) => e,
            Err(e) => {
                let err = map_ignore_error(e);
                if !err.is_recoverable() {
                    tracing::error!(error = %err, "traversal failed");
                    return Err(err);
                }
                report.record_error(err);
                continue;
            }
        };

        let ft = match entry.file_type() {
            Some(ft) => ft,
            None => continue,
        };

        if entry.depth() == 0 {
            report.stats.dirs_visited += 1;
            tracing::info!(path = %entry.path().display(), "in path");
            continue;
        }

        let parent = match entry.path().parent() {
            Some(p) => p,
            None => continue,
        };
        if parent != current_dir {
            context.enter(parent)?;
            current_dir = parent.to_path_buf();
        }

        let task = context.task(entry.file_name());

        match EntryKind::from_file_type(ft) {
            EntryKind::Dir => {
                if mode == Mode::Single {
                    continue;
                }
                let dir = DirectoryEntry {
                    path:  entry.path().to_path_buf(),
                    depth: entry.depth(),
                };
                mirror_directory(&dir, &task, &mut report);
            }
            EntryKind::File => {
                let file = FileEntry {
                    path:              entry.path().to_path_buf(),
                    modification_time: entry.metadata().ok().and_then(|m| m.modified().ok()),
                };
                report.stats.files_seen += 1;
                match copy_pipeline(&task, &*copier) {
                    Ok(outcome) => tally(&mut report, &file, &task, outcome, collect_paths),
                    Err(err) => report.record_error(err),
                }
            }
            kind => {
                tracing::debug!(path = %entry.path().display(), ?kind, "skipping non-regular entry");
            }
        }
    }

    report.stats.duration = start.elapsed();

    tracing::info!(
        copied = report.files_copied,
        skipped = report.files_skipped,
        dirs_created = report.dirs_created,
        errors = report.errors.len(),
        "mirror finished"
    );

    Ok(report)
}

/// Check the source root, create the destination root if needed, and return
/// a context anchored at both roots' canonical forms.
fn prepare_roots(context: TraversalContext) -> Result<TraversalContext, MirrorError> {
    let source_root = context.source_root;
    if !classify::exists_as_directory(&source_root) || !classify::is_readable(&source_root) {
        tracing::error!(path = %source_root.display(), "source root is missing or unreadable");
        return Err(MirrorError::SourceUnavailable(source_root));
    }
    let source_root = dunce::canonicalize(&source_root)
        .map_err(|_| MirrorError::SourceUnavailable(source_root.clone()))?;

    let destination_root = context.destination_root;
    match ensure(&destination_root) {
        Ok(EnsureOutcome::Created) => {
            tracing::info!(path = %destination_root.display(), "created destination root");
        }
        Ok(EnsureOutcome::AlreadyExists) => {}
        Err(MirrorError::DirectoryCreation { path, source }) => {
            tracing::error!(path = %path.display(), error = %source, "cannot create destination root");
            return Err(MirrorError::DestinationUnavailable { path, source });
        }
        Err(other) => return Err(other),
    }
    let destination_root = dunce::canonicalize(&destination_root).map_err(|source| {
        MirrorError::DestinationUnavailable {
            path: destination_root.clone(),
            source,
        }
    })?;

    Ok(TraversalContext::new(source_root, destination_root))
}

fn mirror_directory(dir: &DirectoryEntry, task: &MirrorTask, report: &mut MirrorReport) {
    report.stats.dirs_visited += 1;
    tracing::info!(path = %dir.path.display(), depth = dir.depth, "in path");

    // A failure here is recorded and the files below are still attempted;
    // they will surface their own errors against the missing directory.
    match ensure(&task.destination_path) {
        Ok(EnsureOutcome::Created) => {
            report.dirs_created += 1;
            tracing::info!(path = %task.destination_path.display(), "directory created");
        }
        Ok(EnsureOutcome::AlreadyExists) => {}
        Err(err) => report.record_error(err),
    }
}

// ---------------------------------------------------------------------------
// Copy pipeline
// ---------------------------------------------------------------------------

/// What the copy pipeline decided for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FileOutcome {
    /// Destination did not exist and was written.
    Copied,
    /// Destination was older and was overwritten.
    Updated,
    /// Destination was already up to date.
    UpToDate,
    /// Source and destination are the same file.
    SameFile,
}

/// Staleness check, then the copy if one is needed.
pub(crate) fn copy_pipeline(task: &MirrorTask, copier: &dyn Copier) -> Result<FileOutcome, MirrorError> {
    let existed = classify::exists_as_file(&task.destination_path);

    if !staleness::is_stale_or_missing(&task.source_path, &task.destination_path) {
        return Ok(FileOutcome::UpToDate);
    }

    match copier.copy(&task.source_path, &task.destination_path)? {
        CopyOutcome::Copied { .. } if existed => Ok(FileOutcome::Updated),
        CopyOutcome::Copied { .. } => Ok(FileOutcome::Copied),
        CopyOutcome::Skipped => Ok(FileOutcome::SameFile),
    }
}

fn tally(
    report: &mut MirrorReport,
    file: &FileEntry,
    task: &MirrorTask,
    outcome: FileOutcome,
    collect_paths: bool,
) {
    match outcome {
        FileOutcome::Copied | FileOutcome::Updated => {
            report.files_copied += 1;
            if outcome == FileOutcome::Updated {
                report.files_updated += 1;
                tracing::info!(path = %task.destination_path.display(), "file updated");
            } else {
                tracing::info!(path = %task.destination_path.display(), "file copied");
            }
            if collect_paths {
                report.copied_paths.push(task.destination_path.clone());
            }
        }
        FileOutcome::UpToDate | FileOutcome::SameFile => {
            report.files_skipped += 1;
            tracing::debug!(
                path = %file.path.display(),
                modified = ?file.modification_time,
                "up to date"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Map ignore::Error to MirrorError
// ---------------------------------------------------------------------------

fn map_ignore_error(e: ignore::Error) -> MirrorError {
    match e {
        ignore::Error::WithDepth { err, .. } => map_ignore_error(*err),
        ignore::Error::WithPath { path, err } => match *err {
            ignore::Error::Io(io_err) => map_io_error(path, io_err),
            ignore::Error::Loop { child, .. } => MirrorError::SymlinkLoop(child),
            other => MirrorError::Walk(format!("{}: {}", path.display(), other)),
        },
        ignore::Error::Loop { child, .. } => MirrorError::SymlinkLoop(child),
        ignore::Error::Io(io_err) => map_io_error(PathBuf::new(), io_err),
        other => MirrorError::Walk(other.to_string()),
    }
}

fn map_io_error(path: PathBuf, io_err: std::io::Error) -> MirrorError {
    match io_err.kind() {
        std::io::ErrorKind::PermissionDenied => MirrorError::PermissionDenied(path),
        std::io::ErrorKind::NotFound => MirrorError::NotFound(path),
        _ => MirrorError::Io { path, source: io_err },
    }
}
