use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MirrorError {
    // Start-up
    #[error("source unavailable: {}", .0.display())]
    SourceUnavailable(PathBuf),

    #[error("destination unavailable: {}", .path.display())]
    DestinationUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Per entry
    #[error("could not create directory {}", .path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("symlink loop: {}", .0.display())]
    SymlinkLoop(PathBuf),

    #[error("could not copy to {}", .path.display())]
    Copy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error at {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Runtime
    #[error("walk error: {0}")]
    Walk(String),

    // Config
    #[error("invalid mode {0:?} (expected `single` or `recursive`)")]
    InvalidMode(String),
}

/// Flat classification of a [`MirrorError`], used for the `{path, kind}`
/// listing in a report summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SourceUnavailable,
    DestinationUnavailable,
    DirectoryCreation,
    PermissionDenied,
    NotFound,
    SymlinkLoop,
    Copy,
    Io,
    Unexpected,
    Config,
}

impl MirrorError {
    /// The path this error occurred at, if applicable.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::SourceUnavailable(p)
            | Self::PermissionDenied(p)
            | Self::NotFound(p)
            | Self::SymlinkLoop(p)
            | Self::DestinationUnavailable { path: p, .. }
            | Self::DirectoryCreation { path: p, .. }
            | Self::Copy { path: p, .. }
            | Self::Io { path: p, .. } => Some(p),
            _ => None,
        }
    }

    /// Whether the run can continue after this error.
    ///
    /// Recoverable errors belong to a single entry and end up in
    /// [`MirrorReport::errors`](crate::MirrorReport::errors). Everything else
    /// aborts the run and is returned from `run()` directly.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DirectoryCreation { .. }
                | Self::PermissionDenied(_)
                | Self::NotFound(_)
                | Self::SymlinkLoop(_)
                | Self::Copy { .. }
                | Self::Io { .. }
        )
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SourceUnavailable(_) => ErrorKind::SourceUnavailable,
            Self::DestinationUnavailable { .. } => ErrorKind::DestinationUnavailable,
            Self::DirectoryCreation { .. } => ErrorKind::DirectoryCreation,
            Self::PermissionDenied(_) => ErrorKind::PermissionDenied,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::SymlinkLoop(_) => ErrorKind::SymlinkLoop,
            Self::Copy { .. } => ErrorKind::Copy,
            Self::Io { .. } => ErrorKind::Io,
            Self::Walk(_) => ErrorKind::Unexpected,
            Self::InvalidMode(_) => ErrorKind::Config,
        }
    }

    /// One-line reason for summaries, including the underlying OS error.
    pub fn reason(&self) -> String {
        match self {
            Self::DestinationUnavailable { source, .. }
            | Self::DirectoryCreation { source, .. }
            | Self::Copy { source, .. }
            | Self::Io { source, .. } => format!("{self}: {source}"),
            _ => self.to_string(),
        }
    }

    /// Wrap an I/O error from a copy, promoting permission and not-found
    /// conditions to their own kinds.
    pub(crate) fn from_copy(path: PathBuf, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            _ => Self::Copy { path, source },
        }
    }
}
