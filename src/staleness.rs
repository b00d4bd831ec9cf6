use std::path::Path;

use crate::classify;

/// Decide whether `source` needs to be copied over `destination`.
///
/// Returns `true` when `destination` is not an existing file, or when the
/// source was modified strictly later than the destination. Equal
/// timestamps count as up to date.
///
/// If either timestamp cannot be read the answer is `true`: the copy is
/// attempted and any real problem surfaces as a copy error.
pub fn is_stale_or_missing(source: &Path, destination: &Path) -> bool {
    if !classify::exists_as_file(destination) {
        return true;
    }

    match (
        classify::modification_time(source),
        classify::modification_time(destination),
    ) {
        (Ok(src), Ok(dst)) => src > dst,
        _ => true,
    }
}
