//! Filesystem access for the scanners.
//!
//! The [`SourceTree`] trait is the only way the scan stage touches the disk:
//! list a directory, check that a directory exists, create a missing one.
//! Keeping it this small lets the collectors in [`crate::scan`] run against
//! an in-memory tree in tests, with a fully deterministic entry order.
//!
//! The production implementation is [`LocalTree`], backed by `walkdir`
//! limited to a single level. Entry order is whatever the host filesystem
//! returns. No sorting is applied, so manifest order follows the directory
//! order the site has always used.

use std::io;
use std::path::Path;
use tracing::warn;
use walkdir::WalkDir;

/// What a directory entry is. Symlinks are resolved to their target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Other,
}

/// One entry returned by [`SourceTree::list_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub name: String,
    pub kind: EntryKind,
    /// Size in bytes (0 for directories).
    pub size: u64,
}

/// Minimal directory access needed by the scanners.
pub trait SourceTree: Sync {
    /// True if `path` exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Direct children of `path`, in enumeration order.
    fn list_dir(&self, path: &Path) -> io::Result<Vec<TreeEntry>>;

    /// Create `path` and any missing parents.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTree;

impl SourceTree for LocalTree {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<TreeEntry>> {
        if !path.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("not a directory: {}", path.display()),
            ));
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(path).min_depth(1).max_depth(1).follow_links(true) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    // Broken symlink or unreadable entry: skip it, keep the rest.
                    warn!(dir = %path.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            let file_type = entry.file_type();
            let kind = if file_type.is_dir() {
                EntryKind::Dir
            } else if file_type.is_file() {
                EntryKind::File
            } else {
                EntryKind::Other
            };
            let size = match kind {
                EntryKind::File => entry.metadata().map(|m| m.len()).unwrap_or(0),
                _ => 0,
            };
            entries.push(TreeEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
                size,
            });
        }
        Ok(entries)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}
