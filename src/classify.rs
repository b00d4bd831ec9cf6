//! Existence, type and readability queries.
//!
//! None of these fail: a path that cannot be inspected simply answers `false`.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

/// `true` if `path` exists and resolves to a regular file.
pub fn exists_as_file(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// `true` if `path` exists and resolves to a directory.
pub fn exists_as_directory(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

/// `true` if the current process can read `path`.
///
/// Directories must be listable, files must be openable for reading.
pub fn is_readable(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(m) if m.is_dir() => fs::read_dir(path).is_ok(),
        Ok(_) => fs::File::open(path).is_ok(),
        Err(_) => false,
    }
}

/// Modification time of `path`, following symlinks.
pub(crate) fn modification_time(path: &Path) -> std::io::Result<SystemTime> {
    fs::metadata(path)?.modified()
}
