//! Per-invocation context.
//!
//! Built once by the caller and passed into every engine call: which project
//! root, which user is acting, and where that user's private key comes from.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::core::constants::{KEY_DIR, PRIVATE_KEY_FILE};
use crate::core::keys::{self, KeyPair};
use crate::core::layout::Layout;
use crate::core::types::UserId;
use crate::error::{AccessError, Error, NotFoundError, Result, ValidationError};

/// Where the caller's private key comes from.
pub enum KeySource {
    /// `<data_dir>/kanuka/keys/<project uuid>/privkey`.
    Default,
    /// An explicit key file.
    File(PathBuf),
    /// Key text supplied once (e.g. piped on stdin). Never written anywhere.
    Bytes(Zeroizing<Vec<u8>>),
}

impl fmt::Debug for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "Default"),
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
            Self::Bytes(_) => write!(f, "Bytes([REDACTED])"),
        }
    }
}

/// Everything an engine call needs to know about its caller.
#[derive(Debug)]
pub struct Context {
    layout: Layout,
    user: UserId,
    key: KeySource,
}

impl Context {
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidUserId` if `user` cannot name a file.
    pub fn new(root: impl Into<PathBuf>, user: impl Into<UserId>, key: KeySource) -> Result<Self> {
        let user = user.into();
        validate_user_id(&user)?;
        Ok(Self {
            layout: Layout::new(root),
            user,
            key,
        })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn key_source(&self) -> &KeySource {
        &self.key
    }

    /// Load the caller's key pair for the project `project`.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::NoPrivateKey` if the key file is missing and a
    /// `KeyError` if it does not parse.
    pub fn load_keypair(&self, project: Uuid) -> Result<KeyPair> {
        match &self.key {
            KeySource::Bytes(bytes) => {
                debug!("loading private key from supplied bytes");
                keys::parse_private_key(bytes)
            }
            KeySource::File(path) => load_key_file(path),
            KeySource::Default => load_key_file(&default_key_path(project)?),
        }
    }
}

fn load_key_file(path: &Path) -> Result<KeyPair> {
    debug!(path = %path.display(), "loading private key");

    if !path.exists() {
        return Err(AccessError::NoPrivateKey(path.display().to_string()).into());
    }

    #[cfg(unix)]
    crate::core::store::warn_if_exposed(path);

    let bytes = Zeroizing::new(std::fs::read(path).map_err(|e| Error::io(path, e))?);
    keys::parse_private_key(&bytes)
}

/// Default private key location for a project.
pub fn default_key_path(project: Uuid) -> Result<PathBuf> {
    let data = dirs::data_dir()
        .ok_or_else(|| NotFoundError::Path("unable to determine data directory".to_string()))?;
    Ok(data
        .join(KEY_DIR)
        .join(project.to_string())
        .join(PRIVATE_KEY_FILE))
}

/// Validate a user id.
///
/// User ids name files in `.kanuka/`, so they must be a single, visible path
/// segment: non-empty, at most 128 characters from `A-Z a-z 0-9 - _ . @ +`,
/// and not starting with a dot.
pub fn validate_user_id(id: &str) -> Result<()> {
    let invalid = |reason: &str| -> Error {
        ValidationError::InvalidUserId {
            id: id.to_string(),
            reason: reason.to_string(),
        }
        .into()
    };

    if id.is_empty() {
        return Err(invalid("cannot be empty"));
    }
    if id.len() > 128 {
        return Err(invalid("longer than 128 characters"));
    }
    if id.starts_with('.') {
        return Err(invalid("cannot start with '.'"));
    }
    if let Some(ch) = id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@' | '+')))
    {
        return Err(invalid(&format!("invalid character '{}'", ch)));
    }
    Ok(())
}
