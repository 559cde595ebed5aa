//! In-memory filesystem for testing.
//!
//! `MemoryFileSystem` implements the [`FileSystem`] trait over a map of
//! normalized paths. The root directory always exists; writing a file
//! creates its parent directories.
//!
//! # Example
//!
//! ```
//! use dotazure::fs::{FileSystem, MemoryFileSystem};
//! use std::path::Path;
//!
//! let fs = MemoryFileSystem::new();
//! fs.write("/p/.azure/config.json", r#"{"defaultEnvironment":"dev"}"#).unwrap();
//!
//! let content = fs.read_to_string(Path::new("/p/.azure/config.json")).unwrap();
//! assert!(content.contains("dev"));
//! ```

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{normalize, FileStat, FileSystem};

#[derive(Debug, Clone)]
enum Node {
    Directory,
    File(String),
}

/// In-memory [`FileSystem`].
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    nodes: RwLock<BTreeMap<PathBuf, Node>>,
}

impl MemoryFileSystem {
    /// Create an empty filesystem containing only the root directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a file, creating parent directories as needed.
    ///
    /// Replaces an existing file.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidInput` if `path` is a directory, or with
    /// `AlreadyExists` if one of its ancestors is a file.
    pub fn write(&self, path: impl AsRef<Path>, contents: impl Into<String>) -> io::Result<()> {
        let path = normalize(path.as_ref());
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent)?;
        }
        let mut nodes = self.write_nodes();
        if Self::is_root(&path) || matches!(nodes.get(&path), Some(Node::Directory)) {
            return Err(is_a_directory(&path));
        }
        nodes.insert(path, Node::File(contents.into()));
        Ok(())
    }

    /// Remove a file or an empty directory. Returns whether anything was removed.
    pub fn remove(&self, path: impl AsRef<Path>) -> bool {
        let path = normalize(path.as_ref());
        let mut nodes = self.write_nodes();
        let has_children = nodes.keys().any(|p| p != &path && p.starts_with(&path));
        if has_children {
            return false;
        }
        nodes.remove(&path).is_some()
    }

    fn read_nodes(&self) -> RwLockReadGuard<'_, BTreeMap<PathBuf, Node>> {
        self.nodes.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_nodes(&self) -> RwLockWriteGuard<'_, BTreeMap<PathBuf, Node>> {
        self.nodes.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_root(path: &Path) -> bool {
        path.parent().is_none() && path.has_root()
    }
}

impl FileSystem for MemoryFileSystem {
    fn stat(&self, path: &Path) -> io::Result<FileStat> {
        let path = normalize(path);
        if Self::is_root(&path) {
            return Ok(FileStat::directory());
        }
        match self.read_nodes().get(&path) {
            Some(Node::Directory) => Ok(FileStat::directory()),
            Some(Node::File(_)) => Ok(FileStat::file()),
            None => Err(not_found(&path)),
        }
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let path = normalize(path);
        if Self::is_root(&path) {
            return Err(is_a_directory(&path));
        }
        match self.read_nodes().get(&path) {
            Some(Node::File(contents)) => Ok(contents.clone()),
            Some(Node::Directory) => Err(is_a_directory(&path)),
            None => Err(not_found(&path)),
        }
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let path = normalize(path);
        let mut nodes = self.write_nodes();

        // Ancestors from the outermost down, so a file in the way is found
        // before anything gets inserted.
        let mut ancestors: Vec<&Path> = path
            .ancestors()
            .filter(|p| !p.as_os_str().is_empty() && !Self::is_root(p))
            .collect();
        ancestors.reverse();

        for dir in &ancestors {
            if let Some(Node::File(_)) = nodes.get(*dir) {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("{} exists and is not a directory", dir.display()),
                ));
            }
        }
        for dir in ancestors {
            nodes.entry(dir.to_path_buf()).or_insert(Node::Directory);
        }
        Ok(())
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{}: no such file or directory", path.display()),
    )
}

fn is_a_directory(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("{}: is a directory", path.display()),
    )
}
