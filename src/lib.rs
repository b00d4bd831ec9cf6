//! # backup_buddy
//!
//! Mirror a source directory tree into a destination tree, copying only
//! files that are missing at the destination or whose source was modified
//! more recently.
//!
//! Staleness is decided purely on modification time (strictly newer wins).
//! Nothing is ever deleted from the destination. A failure on one file or
//! directory is recorded in the [`MirrorReport`] and the run carries on.
//!
//! # Quick Start
//!
//! ```rust
//! use backup_buddy::Mode;
//!
//! let src = tempfile::tempdir().unwrap();
//! let dst = tempfile::tempdir().unwrap();
//! std::fs::create_dir(src.path().join("sub")).unwrap();
//! std::fs::write(src.path().join("sub/deep.txt"), "hello").unwrap();
//!
//! let report = backup_buddy::mirror(src.path(), dst.path(), Mode::Recursive).unwrap();
//!
//! assert_eq!(report.files_copied, 1);
//! assert_eq!(report.dirs_created, 1);
//! assert!(dst.path().join("sub/deep.txt").is_file());
//! ```
//!
//! # Custom Copiers
//!
//! Implement [`Copier`] to change how the bytes move, and hand it to the
//! builder:
//!
//! ```rust
//! use std::path::Path;
//! use backup_buddy::{Copier, CopyOutcome, MirrorError};
//!
//! struct DryRun;
//!
//! impl Copier for DryRun {
//!     fn copy(&self, source: &Path, destination: &Path) -> Result<CopyOutcome, MirrorError> {
//!         println!("would copy {} -> {}", source.display(), destination.display());
//!         Ok(CopyOutcome::Copied { bytes: 0 })
//!     }
//! }
//!
//! let src = tempfile::tempdir().unwrap();
//! let dst = tempfile::tempdir().unwrap();
//! let report = backup_buddy::builder(src.path(), dst.path())
//!     .copier(DryRun)
//!     .run()
//!     .unwrap();
//! assert!(report.is_clean());
//! ```

#![forbid(unsafe_code)]

pub mod classify;
pub mod engine;

mod builder;
mod copy;
mod ensure;
mod entry;
mod error;
mod rebase;
mod results;
mod staleness;
mod traits;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::MirrorBuilder;
pub use copy::{CopyOutcome, FsCopier};
pub use engine::Mode;
pub use ensure::{ensure, EnsureOutcome};
pub use entry::{DirectoryEntry, EntryKind, FileEntry, MirrorTask};
pub use error::{ErrorKind, MirrorError};
pub use rebase::{rebase, TraversalContext};
pub use results::{MirrorReport, RunStats};
pub use staleness::is_stale_or_missing;
pub use traits::Copier;

use std::path::PathBuf;

// ── Entry points ──────────────────────────────────────────────────────────────

/// Create a [`MirrorBuilder`] for `source_root` → `destination_root`.
pub fn builder(
    source_root: impl Into<PathBuf>,
    destination_root: impl Into<PathBuf>,
) -> MirrorBuilder {
    MirrorBuilder::new(source_root, destination_root)
}

/// Mirror `source_root` onto `destination_root` with default options.
///
/// # Errors
///
/// See [`MirrorBuilder::run`].
pub fn mirror(
    source_root: impl Into<PathBuf>,
    destination_root: impl Into<PathBuf>,
    mode: Mode,
) -> Result<MirrorReport, MirrorError> {
    builder(source_root, destination_root).mode(mode).run()
}
