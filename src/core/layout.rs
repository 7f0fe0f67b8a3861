//! On-disk layout of a project.
//!
//! ```text
//! <root>/
//! ├── .kanuka/
//! │   ├── config.toml            # project registry
//! │   ├── public_keys/<user>.pub # one per user
//! │   └── secrets/<user>.kanuka  # envelope, one per user with access
//! ├── .env                       # plaintext (never committed)
//! └── .env.kanuka                # ciphertext (committed)
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::core::constants::{
    CONFIG_FILE, ENVELOPE_EXT, KANUKA_DIR, PUBLIC_KEYS_DIR, PUBLIC_KEY_EXT, SECRETS_DIR,
};
use crate::core::store::Store;
use crate::core::types::UserId;
use crate::error::Result;

/// Paths of a project rooted at one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn kanuka_dir(&self) -> PathBuf {
        self.root.join(KANUKA_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.kanuka_dir().join(CONFIG_FILE)
    }

    pub fn public_keys_dir(&self) -> PathBuf {
        self.kanuka_dir().join(PUBLIC_KEYS_DIR)
    }

    pub fn secrets_dir(&self) -> PathBuf {
        self.kanuka_dir().join(SECRETS_DIR)
    }

    pub fn public_key_path(&self, user: &str) -> PathBuf {
        self.public_keys_dir()
            .join(format!("{}.{}", user, PUBLIC_KEY_EXT))
    }

    pub fn envelope_path(&self, user: &str) -> PathBuf {
        self.secrets_dir().join(format!("{}.{}", user, ENVELOPE_EXT))
    }

    /// Users with a public key file.
    pub fn public_key_ids(&self, store: &impl Store) -> Result<BTreeSet<UserId>> {
        ids_with_extension(store, &self.public_keys_dir(), PUBLIC_KEY_EXT)
    }

    /// Users with an envelope file.
    pub fn envelope_ids(&self, store: &impl Store) -> Result<BTreeSet<UserId>> {
        ids_with_extension(store, &self.secrets_dir(), ENVELOPE_EXT)
    }
}

fn ids_with_extension(store: &impl Store, dir: &Path, ext: &str) -> Result<BTreeSet<UserId>> {
    Ok(store
        .list(dir)?
        .into_iter()
        .filter(|path| path.extension().is_some_and(|e| e == ext))
        .filter_map(|path| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .filter(|id| !id.is_empty())
        .collect())
}
