//! In-memory store.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use super::{is_skipped_dir, Store, Visibility};
use crate::error::{Error, Result};

/// An in-memory file tree.
///
/// Directories exist implicitly as ancestors of files. Single-threaded, like
/// the engine itself.
#[derive(Debug, Default, Clone)]
pub struct Memory {
    files: RefCell<BTreeMap<PathBuf, (Vec<u8>, Visibility)>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file.
    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        self.files
            .borrow_mut()
            .insert(path.into(), (contents.into(), Visibility::Private));
    }

    /// Every file and its contents, for before/after comparisons.
    pub fn snapshot(&self) -> BTreeMap<PathBuf, Vec<u8>> {
        self.files
            .borrow()
            .iter()
            .map(|(path, (contents, _))| (path.clone(), contents.clone()))
            .collect()
    }

    /// Visibility a file was last written with.
    pub fn visibility(&self, path: &Path) -> Option<Visibility> {
        self.files.borrow().get(path).map(|(_, v)| *v)
    }

    fn not_found(path: &Path) -> Error {
        Error::io(path, io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }
}

impl Store for Memory {
    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path) || self.is_dir(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.files
            .borrow()
            .keys()
            .any(|file| file != path && file.starts_with(path))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        if let Some((contents, _)) = self.files.borrow().get(path) {
            return Ok(contents.clone());
        }
        if self.is_dir(path) {
            return Err(Error::io(
                path,
                io::Error::new(io::ErrorKind::Other, "is a directory"),
            ));
        }
        Err(Self::not_found(path))
    }

    fn write(&self, path: &Path, contents: &[u8], visibility: Visibility) -> Result<()> {
        if self.is_dir(path) {
            return Err(Error::io(
                path,
                io::Error::new(io::ErrorKind::Other, "is a directory"),
            ));
        }
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), (contents.to_vec(), visibility));
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<()> {
        self.files
            .borrow_mut()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(path))
    }

    fn list(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        Ok(self
            .files
            .borrow()
            .keys()
            .filter(|file| file.parent() == Some(dir))
            .cloned()
            .collect())
    }

    fn walk(&self, root: &Path) -> Result<Vec<PathBuf>> {
        Ok(self
            .files
            .borrow()
            .keys()
            .filter(|file| {
                file.strip_prefix(root).is_ok_and(|rel| {
                    let mut dirs = rel.components().rev().skip(1);
                    !dirs.any(|c| is_skipped_dir(c.as_os_str()))
                })
            })
            .cloned()
            .collect())
    }
}
