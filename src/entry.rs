use std::path::PathBuf;
use std::time::SystemTime;

/// A regular file discovered during traversal.
///
/// Built transiently per traversal step; nothing here is persisted.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Full path to the file under the source root.
    pub path: PathBuf,

    /// Last modification time as reported by the host filesystem.
    /// `None` when the platform cannot report one.
    pub modification_time: Option<SystemTime>,
}

/// A directory discovered during traversal.
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    /// Full path to the directory under the source root.
    pub path: PathBuf,

    /// How deep in the traversal this directory was found. Root = 0.
    pub depth: usize,
}

/// A source path paired with the destination path it mirrors onto.
///
/// Produced by [`TraversalContext::task`](crate::TraversalContext::task) and
/// consumed by the copy pipeline or the directory ensurer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorTask {
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
}

/// The kind of a traversed entry.
///
/// Filesystem walkers map `DirEntry` file types to these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file.
    File,

    /// A directory.
    Dir,

    /// A symbolic link that was not resolved.
    Symlink,

    /// Anything else (device files, pipes, sockets, etc.).
    Other,
}

impl EntryKind {
    pub(crate) fn from_file_type(ft: std::fs::FileType) -> Self {
        if ft.is_dir() {
            Self::Dir
        } else if ft.is_file() {
            Self::File
        } else if ft.is_symlink() {
            Self::Symlink
        } else {
            Self::Other
        }
    }
}
