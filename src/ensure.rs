use std::fs;
use std::path::Path;

use crate::classify;
use crate::error::MirrorError;

/// Result of [`ensure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    Created,
    AlreadyExists,
}

/// Make sure `dir` exists as a directory, creating missing parents.
///
/// Losing a creation race to another process is success, not an error.
pub fn ensure(dir: &Path) -> Result<EnsureOutcome, MirrorError> {
    if classify::exists_as_directory(dir) {
        return Ok(EnsureOutcome::AlreadyExists);
    }

    match fs::create_dir_all(dir) {
        Ok(()) => Ok(EnsureOutcome::Created),
        Err(_) if classify::exists_as_directory(dir) => Ok(EnsureOutcome::AlreadyExists),
        Err(source) => Err(MirrorError::DirectoryCreation {
            path: dir.to_path_buf(),
            source,
        }),
    }
}
