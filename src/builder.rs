use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::copy::FsCopier;
use crate::engine::{run, EngineOptions, Mode};
use crate::error::MirrorError;
use crate::rebase::TraversalContext;
use crate::results::MirrorReport;
use crate::traits::Copier;

// ---------------------------------------------------------------------------
// MirrorBuilder
// ---------------------------------------------------------------------------

/// Entry point for configuring and executing a mirroring run.
///
/// Created via [`backup_buddy::builder()`](crate::builder). Configure with
/// chained builder methods, then call [`run()`](MirrorBuilder::run).
///
/// # Example
///
/// ```rust,ignore
/// let report = backup_buddy::builder("srcDock", "destDock")
///     .mode(Mode::Single)
///     .collect_paths(true)
///     .run()?;
/// ```
pub struct MirrorBuilder {
    source_root:      PathBuf,
    destination_root: PathBuf,
    mode:             Mode,
    copier:           Box<dyn Copier>,
    collect_paths:    bool,
    cancel:           Arc<AtomicBool>,
}

impl MirrorBuilder {
    pub fn new(source_root: impl Into<PathBuf>, destination_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root:      source_root.into(),
            destination_root: destination_root.into(),
            mode:             Mode::default(),
            copier:           Box::new(FsCopier),
            collect_paths:    false,
            cancel:           Arc::new(AtomicBool::new(false)),
        }
    }

    // ── Options ───────────────────────────────────────────────────────────

    /// Single-level or recursive. Recursive by default.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Shorthand for `.mode(Mode::Recursive)` / `.mode(Mode::Single)`.
    pub fn recursive(self, yes: bool) -> Self {
        self.mode(if yes { Mode::Recursive } else { Mode::Single })
    }

    /// Collect copied destination paths into [`MirrorReport::copied_paths`].
    ///
    /// Disabled by default to avoid allocation overhead on large trees.
    pub fn collect_paths(mut self, yes: bool) -> Self {
        self.collect_paths = yes;
        self
    }

    /// Replace the copy executor. Defaults to [`FsCopier`].
    pub fn copier(mut self, c: impl Copier + 'static) -> Self {
        self.copier = Box::new(c);
        self
    }

    /// Share a cancel flag with the caller.
    ///
    /// Setting it to `true` from any thread (a Ctrl+C handler, typically)
    /// stops the run before the next entry. Files already copied stay valid.
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = flag;
        self
    }

    // ── Execute ───────────────────────────────────────────────────────────

    /// Execute the run and return its report.
    ///
    /// # Errors
    ///
    /// Returns `Err` only for fatal conditions: the source root is missing or
    /// unreadable, the destination root cannot be created, or the traversal
    /// fails in a way not tied to one entry. Per-entry failures are collected
    /// into [`MirrorReport::errors`].
    pub fn run(self) -> Result<MirrorReport, MirrorError> {
        let opts = EngineOptions {
            context:       TraversalContext::new(self.source_root, self.destination_root),
            mode:          self.mode,
            copier:        self.copier,
            collect_paths: self.collect_paths,
            cancel:        self.cancel,
        };

        run(opts)
    }
}
