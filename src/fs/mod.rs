//! Filesystem capability used by project resolution and loading.
//!
//! Resolution and loading never touch `std::fs` directly; they go through a
//! [`FileSystem`] handed to them by the caller. Two implementations ship:
//!
//! - [`OsFileSystem`] - the real filesystem
//! - [`MemoryFileSystem`] - an in-memory tree for tests and dry runs
//!
//! # Example
//!
//! ```
//! use dotazure::fs::{FileSystem, MemoryFileSystem};
//! use std::path::Path;
//!
//! let fs = MemoryFileSystem::new();
//! fs.write("/p/azure.yaml", "name: app").unwrap();
//!
//! assert!(fs.stat(Path::new("/p/azure.yaml")).unwrap().is_file());
//! assert!(fs.stat(Path::new("/p")).unwrap().is_dir());
//! ```

pub mod memory;
pub mod os;

pub use memory::MemoryFileSystem;
pub use os::OsFileSystem;

use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// What kind of entry a path refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// A regular file.
    File,
    /// A directory.
    Directory,
    /// Anything else (sockets, fifos, devices).
    Other,
}

/// Result of [`FileSystem::stat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    /// Kind of the entry.
    pub kind: FileKind,
}

impl FileStat {
    /// Stat for a regular file.
    pub fn file() -> Self {
        Self {
            kind: FileKind::File,
        }
    }

    /// Stat for a directory.
    pub fn directory() -> Self {
        Self {
            kind: FileKind::Directory,
        }
    }

    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        self.kind == FileKind::File
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Directory
    }
}

/// Trait for filesystem access.
///
/// This trait allows swapping the real filesystem for an in-memory one in
/// tests. Errors use [`io::Error`] so callers can match on
/// [`io::ErrorKind::NotFound`] regardless of the implementation.
pub trait FileSystem: Send + Sync {
    /// Get information about the entry at `path`, following symlinks.
    fn stat(&self, path: &Path) -> io::Result<FileStat>;

    /// Read a whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Create a directory and all missing parents.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// The filesystem used when a caller does not inject one.
pub fn default_fs() -> Arc<dyn FileSystem> {
    Arc::new(OsFileSystem)
}

/// Lexically normalize a path: drop `.` and resolve `..` against the
/// preceding component. Never consults the filesystem.
///
/// ```
/// use dotazure::fs::normalize;
/// use std::path::Path;
///
/// assert_eq!(normalize(Path::new("/p/src/../.azure/./dev")), Path::new("/p/.azure/dev"));
/// assert_eq!(normalize(Path::new("/../p")), Path::new("/p"));
/// ```
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_stat_helpers() {
        assert!(FileStat::file().is_file());
        assert!(!FileStat::file().is_dir());
        assert!(FileStat::directory().is_dir());
        assert!(!FileStat::directory().is_file());

        let other = FileStat {
            kind: FileKind::Other,
        };
        assert!(!other.is_file());
        assert!(!other.is_dir());
    }

    #[test]
    fn normalize_drops_cur_dir() {
        assert_eq!(normalize(Path::new("/a/./b/.")), PathBuf::from("/a/b"));
    }

    #[test]
    fn normalize_resolves_parent_dir() {
        assert_eq!(normalize(Path::new("/a/b/../c")), PathBuf::from("/a/c"));
    }

    #[test]
    fn normalize_stops_at_root() {
        assert_eq!(normalize(Path::new("/../../a")), PathBuf::from("/a"));
    }

    #[test]
    fn default_fs_reads_real_files() {
        let temp = tempfile::TempDir::new().unwrap();
        let fs = default_fs();
        assert!(fs.stat(temp.path()).unwrap().is_dir());
    }
}
