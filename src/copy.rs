use std::fs;
use std::path::Path;

use crate::error::MirrorError;
use crate::traits::Copier;

/// What a single copy call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// The destination now holds the source's bytes.
    Copied { bytes: u64 },

    /// Source and destination are the same file; nothing was written.
    Skipped,
}

/// Copies with [`std::fs::copy`], overwriting the destination.
///
/// Only the metadata the platform copy carries over is preserved (file
/// permissions on most systems). A failed copy may leave a truncated
/// destination behind; the next run overwrites it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsCopier;

impl Copier for FsCopier {
    fn copy(&self, source: &Path, destination: &Path) -> Result<CopyOutcome, MirrorError> {
        if same_file(source, destination) {
            tracing::warn!(path = %destination.display(), "source and destination are the same file");
            return Ok(CopyOutcome::Skipped);
        }

        fs::copy(source, destination)
            .map(|bytes| CopyOutcome::Copied { bytes })
            .map_err(|e| MirrorError::from_copy(destination.to_path_buf(), e))
    }
}

/// Whether both paths name the same underlying file.
///
/// A missing destination is never the same file.
#[cfg(unix)]
fn same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(ma), Ok(mb)) => ma.dev() == mb.dev() && ma.ino() == mb.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn same_file(a: &Path, b: &Path) -> bool {
    match (dunce::canonicalize(a), dunce::canonicalize(b)) {
        (Ok(ca), Ok(cb)) => ca == cb,
        _ => false,
    }
}
