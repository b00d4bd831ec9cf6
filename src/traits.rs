use std::path::Path;

use crate::copy::CopyOutcome;
use crate::error::MirrorError;

/// Performs the byte copy of one file.
///
/// The engine calls this only after the staleness check has decided a copy
/// is needed. The default implementation is [`FsCopier`](crate::FsCopier);
/// implement this to redirect or observe copies (dry runs, fault injection
/// in tests, and so on).
///
/// # Error Handling
///
/// Return `Err` for failures that belong to this one file. The engine records
/// them in [`MirrorReport::errors`](crate::MirrorReport::errors) and moves on
/// to the next entry.
///
/// # Example
///
/// ```rust
/// use std::path::Path;
/// use backup_buddy::{Copier, CopyOutcome, MirrorError};
///
/// struct DryRun;
///
/// impl Copier for DryRun {
///     fn copy(&self, _source: &Path, _destination: &Path) -> Result<CopyOutcome, MirrorError> {
///         Ok(CopyOutcome::Copied { bytes: 0 })
///     }
/// }
/// ```
pub trait Copier: Send + Sync {
    /// Copy `source` over `destination`, replacing its contents.
    fn copy(&self, source: &Path, destination: &Path) -> Result<CopyOutcome, MirrorError>;
}
