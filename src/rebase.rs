//! Mapping source-tree paths onto the destination tree.
//!
//! The relative subpath is always computed by stripping the known source
//! root off the current directory as whole path components. Matching on a
//! directory *name* would mis-anchor as soon as that name reappears deeper
//! in the tree (`backup/data/backup/x`).

use std::path::{Path, PathBuf};

use crate::entry::MirrorTask;
use crate::error::MirrorError;

/// Roots of one mirroring run plus the position of the walk.
///
/// `relative_subpath` is `None` exactly when the walk is positioned at
/// `source_root`; otherwise it is the components between `source_root` and
/// the current directory, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalContext {
    pub source_root: PathBuf,
    pub destination_root: PathBuf,
    pub relative_subpath: Option<PathBuf>,
}

impl TraversalContext {
    pub fn new(source_root: impl Into<PathBuf>, destination_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            destination_root: destination_root.into(),
            relative_subpath: None,
        }
    }

    /// Position the context at `dir`, which must be `source_root` or lie
    /// beneath it.
    pub fn enter(&mut self, dir: &Path) -> Result<(), MirrorError> {
        let rel = dir.strip_prefix(&self.source_root).map_err(|_| {
            MirrorError::Walk(format!(
                "{} is outside source root {}",
                dir.display(),
                self.source_root.display()
            ))
        })?;

        self.relative_subpath = if rel.as_os_str().is_empty() {
            None
        } else {
            Some(rel.to_path_buf())
        };
        Ok(())
    }

    /// The directory the context is currently positioned at.
    pub fn current_source_dir(&self) -> PathBuf {
        match &self.relative_subpath {
            Some(rel) => self.source_root.join(rel),
            None => self.source_root.clone(),
        }
    }

    /// Pair `entry_name` in the current directory with its destination.
    pub fn task(&self, entry_name: impl AsRef<Path>) -> MirrorTask {
        let entry_name = entry_name.as_ref();
        MirrorTask {
            source_path: self.current_source_dir().join(entry_name),
            destination_path: rebase(entry_name, self),
        }
    }
}

/// `destination_root / relative_subpath / entry_name`, or
/// `destination_root / entry_name` at the top level. No I/O.
pub fn rebase(entry_name: impl AsRef<Path>, ctx: &TraversalContext) -> PathBuf {
    match &ctx.relative_subpath {
        Some(rel) => ctx.destination_root.join(rel).join(entry_name),
        None => ctx.destination_root.join(entry_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> TraversalContext {
        TraversalContext::new("/data/srcDock", "/backup/destDock")
    }

    #[test]
    fn top_level_entries_land_directly_under_destination() {
        let c = ctx();
        assert_eq!(c.relative_subpath, None);
        assert_eq!(rebase("notes.txt", &c), PathBuf::from("/backup/destDock/notes.txt"));
    }

    #[test]
    fn nested_entries_keep_their_subpath() {
        let mut c = ctx();
        c.enter(Path::new("/data/srcDock/a/b")).unwrap();
        assert_eq!(c.relative_subpath, Some(PathBuf::from("a/b")));
        assert_eq!(
            rebase("file.txt", &c),
            PathBuf::from("/backup/destDock/a/b/file.txt")
        );
    }

    #[test]
    fn entering_the_root_clears_the_subpath() {
        let mut c = ctx();
        c.enter(Path::new("/data/srcDock/a")).unwrap();
        c.enter(Path::new("/data/srcDock")).unwrap();
        assert_eq!(c.relative_subpath, None);
    }

    #[test]
    fn repeated_root_name_deeper_in_tree_does_not_mis_anchor() {
        let mut c = ctx();
        c.enter(Path::new("/data/srcDock/x/srcDock/y")).unwrap();
        assert_eq!(
            rebase("f", &c),
            PathBuf::from("/backup/destDock/x/srcDock/y/f")
        );
    }

    #[test]
    fn sibling_with_root_as_name_prefix_is_rejected() {
        let mut c = ctx();
        assert!(c.enter(Path::new("/data/srcDock2/a")).is_err());
        assert!(c.enter(Path::new("/elsewhere")).is_err());
    }

    #[test]
    fn task_pairs_source_and_destination() {
        let mut c = ctx();
        c.enter(Path::new("/data/srcDock/sub")).unwrap();
        let t = c.task("deep.txt");
        assert_eq!(t.source_path, PathBuf::from("/data/srcDock/sub/deep.txt"));
        assert_eq!(t.destination_path, PathBuf::from("/backup/destDock/sub/deep.txt"));
    }
}
