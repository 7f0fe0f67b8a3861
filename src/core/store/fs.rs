//! Local filesystem store.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{trace, warn};

use super::{is_skipped_dir, Store, Visibility};
use crate::error::{Error, Result};

/// The local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct Filesystem;

impl Filesystem {
    fn walk_into(&self, dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
        let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(dir, e))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| Error::io(&path, e))?;

            if file_type.is_dir() {
                if !is_skipped_dir(&entry.file_name()) {
                    self.walk_into(&path, out)?;
                }
            } else if file_type.is_file() {
                out.push(path);
            }
        }
        Ok(())
    }
}

/// Warn when a file that should be private is readable by others (Unix only).
#[cfg(unix)]
pub(crate) fn warn_if_exposed(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Ok(metadata) = fs::metadata(path) {
        let mode = metadata.permissions().mode() & 0o777;
        if mode & 0o077 != 0 {
            warn!(
                path = %path.display(),
                mode = %format!("{:o}", mode),
                "insecure file permissions"
            );
        }
    }
}

impl Store for Filesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        trace!(path = %path.display(), "reading");
        fs::read(path).map_err(|e| Error::io(path, e))
    }

    fn write(&self, path: &Path, contents: &[u8], visibility: Visibility) -> Result<()> {
        trace!(path = %path.display(), len = contents.len(), ?visibility, "writing");

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(visibility.mode());
        }
        let mut file = options.open(path).map_err(|e| Error::io(path, e))?;
        file.write_all(contents).map_err(|e| Error::io(path, e))?;
        drop(file);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(visibility.mode()))
                .map_err(|e| Error::io(path, e))?;
        }

        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<()> {
        trace!(path = %path.display(), "removing");
        fs::remove_file(path).map_err(|e| Error::io(path, e))
    }

    fn list(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
            let entry = entry.map_err(|e| Error::io(dir, e))?;
            if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }

    fn walk(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        if root.is_dir() {
            self.walk_into(root, &mut files)?;
        }
        files.sort();
        Ok(files)
    }
}
