//! File access for the engine.
//!
//! Everything the engine reads or writes inside a project goes through
//! [`Store`], so planning and selection can run against an in-memory tree in
//! tests exactly as they run against the real filesystem.
//!
//! ## Implementations
//!
//! - [`Filesystem`]: the local filesystem.
//! - [`Memory`]: an in-memory tree of files.

use std::path::{Path, PathBuf};

use crate::error::Result;

mod fs;
mod memory;

#[cfg(unix)]
pub(crate) use fs::warn_if_exposed;
pub use fs::Filesystem;
pub use memory::Memory;

/// Who may read a written file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Owner only (0600): private keys, envelopes, ciphertext, plaintext.
    Private,
    /// World-readable (0644): public keys, the project registry.
    Public,
}

impl Visibility {
    #[cfg(unix)]
    pub(crate) fn mode(self) -> u32 {
        match self {
            Self::Private => 0o600,
            Self::Public => 0o644,
        }
    }
}

/// File access trait.
///
/// Each call opens, fully reads or writes, and releases its file before
/// returning.
pub trait Store {
    /// Whether anything (file or directory) exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Read a whole file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file is missing, unreadable, or a directory.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Create or replace a file, creating parent directories as needed.
    fn write(&self, path: &Path, contents: &[u8], visibility: Visibility) -> Result<()>;

    /// Delete a file.
    fn remove(&self, path: &Path) -> Result<()>;

    /// Files directly inside `dir`, sorted. A missing directory is empty.
    fn list(&self, dir: &Path) -> Result<Vec<PathBuf>>;

    /// Files anywhere below `root`, sorted, without descending into
    /// [`SKIPPED_DIRS`](crate::core::constants::SKIPPED_DIRS).
    fn walk(&self, root: &Path) -> Result<Vec<PathBuf>>;
}

/// Whether a directory name is excluded from [`Store::walk`].
pub(crate) fn is_skipped_dir(name: &std::ffi::OsStr) -> bool {
    crate::core::constants::SKIPPED_DIRS
        .iter()
        .any(|skipped| name == std::ffi::OsStr::new(skipped))
}
