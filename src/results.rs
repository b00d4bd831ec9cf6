use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ErrorKind, MirrorError};

/// The output of a completed (or interrupted) mirroring run.
///
/// `copied_paths` is opt-in: enable it with `.collect_paths(true)` on the
/// builder. `errors` is always populated.
#[derive(Debug, Default)]
pub struct MirrorReport {
    /// Files written to the destination, new and updated alike.
    pub files_copied: usize,

    /// Subset of `files_copied` that replaced an older destination file.
    pub files_updated: usize,

    /// Files left alone because the destination was already up to date
    /// (or was the source file itself).
    pub files_skipped: usize,

    /// Destination directories created during the run. The destination root
    /// itself is not counted.
    pub dirs_created: usize,

    /// Destination paths of copied files, in the order they were copied.
    /// Only populated if `.collect_paths(true)` was set on the builder.
    pub copied_paths: Vec<PathBuf>,

    /// Per-entry failures. Each one was logged and the run went on.
    pub errors: Vec<MirrorError>,

    /// `true` if the run stopped early because the cancel flag was raised.
    pub interrupted: bool,

    /// Traversal statistics.
    pub stats: RunStats,
}

/// Traversal statistics for a run.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunStats {
    /// Regular files looked at in the source tree.
    pub files_seen: usize,

    /// Source directories entered, root included.
    pub dirs_visited: usize,

    /// Wall-clock time of the run.
    pub duration: Duration,
}

impl MirrorReport {
    /// `true` when every entry was copied or skipped without error.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && !self.interrupted
    }

    /// `{path, kind}` view of the collected errors.
    pub fn error_kinds(&self) -> impl Iterator<Item = (Option<&Path>, ErrorKind)> + '_ {
        self.errors
            .iter()
            .map(|e| (e.path().map(PathBuf::as_path), e.kind()))
    }

    pub(crate) fn record_error(&mut self, err: MirrorError) {
        tracing::warn!(error = %err.reason(), "entry failed");
        self.errors.push(err);
    }
}
