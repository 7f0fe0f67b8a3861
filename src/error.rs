//! Error types.
//!
//! Every message starts with a stable prefix per error kind (`format error:`,
//! `access denied:`, `decryption failed:`, ...) so callers can match on the
//! text without depending on these types.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Some effects of an applied batch failed; the rest were written.
    #[error("partial failure: {failed} of {total} files could not be processed")]
    Partial { failed: usize, total: usize },

    #[error("io error: {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Format,
    AccessDenied,
    Decryption,
    Encryption,
    NotFound,
    Validation,
    Config,
    Partial,
    Io,
}

impl ErrorKind {
    /// The stable message prefix for this kind.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Format => "format error:",
            Self::AccessDenied => "access denied:",
            Self::Decryption => "decryption failed:",
            Self::Encryption => "encryption failed:",
            Self::NotFound => "not found:",
            Self::Validation => "validation error:",
            Self::Config => "config error:",
            Self::Partial => "partial failure:",
            Self::Io => "io error:",
        }
    }
}

impl Error {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Key(_) => ErrorKind::Format,
            Self::Access(_) => ErrorKind::AccessDenied,
            Self::Cipher(CipherError::EncryptionFailed(_) | CipherError::WrapFailed(_)) => {
                ErrorKind::Encryption
            }
            Self::Cipher(_) => ErrorKind::Decryption,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Config(_) => ErrorKind::Config,
            Self::Partial { .. } => ErrorKind::Partial,
            Self::Io { .. } => ErrorKind::Io,
        }
    }
}

/// Key material that could not be parsed or produced.
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("format error: {0} key input is empty")]
    Empty(KeyRole),

    #[error("format error: {0} key is not in a supported encoding")]
    Unrecognized(KeyRole),

    #[error("format error: {0} keys are not supported, expected ssh-rsa")]
    UnsupportedAlgorithm(String),

    #[error("format error: OpenSSH private key is passphrase-protected")]
    Encrypted,

    #[error("format error: failed to encode key: {0}")]
    Encode(String),

    #[error("format error: key generation failed: {0}")]
    Generation(String),
}

/// Which half of a key pair a [`KeyError`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    Private,
    Public,
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Private => write!(f, "private"),
            Self::Public => write!(f, "public"),
        }
    }
}

/// The caller cannot reach the project secret.
#[derive(Error, Debug)]
pub enum AccessError {
    #[error("access denied: no access envelope for user '{0}'")]
    NoEnvelope(String),

    #[error("access denied: the envelope for user '{0}' cannot be opened with your private key")]
    EnvelopeMismatch(String),

    #[error("access denied: the public key registered for '{0}' does not match your private key")]
    KeyMismatch(String),

    #[error("access denied: no private key at {0}")]
    NoPrivateKey(String),
}

/// Symmetric or asymmetric cipher failure.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("decryption failed: {0} is corrupt, tampered with, or sealed under a different key")]
    Tampered(Subject),

    #[error("decryption failed: {0} is shorter than the 24-byte nonce")]
    Truncated(Subject),

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("encryption failed: could not wrap project secret: {0}")]
    WrapFailed(String),
}

impl CipherError {
    /// Attach a content file path to a content decryption failure.
    pub fn at(self, path: &Path) -> Self {
        let file = Subject::File(path.to_path_buf());
        match self {
            Self::Tampered(Subject::Content) => Self::Tampered(file),
            Self::Truncated(Subject::Content) => Self::Truncated(file),
            other => other,
        }
    }
}

/// What a decryption failure was about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    Envelope,
    Content,
    File(PathBuf),
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Envelope => write!(f, "your access envelope"),
            Self::Content => write!(f, "content"),
            Self::File(path) => write!(f, "content file {}", path.display()),
        }
    }
}

#[derive(Error, Debug)]
pub enum NotFoundError {
    #[error("not found: no project at {0} (run: kanuka init)")]
    NotInitialized(String),

    #[error("not found: {0}")]
    Path(String),

    #[error("not found: user '{0}' is not registered")]
    User(String),
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("validation error: {path} is not {expected}")]
    WrongFileKind {
        path: String,
        expected: &'static str,
    },

    #[error("validation error: invalid user id '{id}': {reason}")]
    InvalidUserId { id: String, reason: String },

    #[error("validation error: project already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("validation error: user '{0}' already has a public key in this project")]
    UserExists(String),

    #[error("validation error: a preview plan cannot be applied")]
    PreviewPlan,
}

/// Project registry file problems.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config error: failed to parse project file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config error: failed to serialize project file: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("config error: project file is not valid UTF-8")]
    Encoding,

    #[error("config error: failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
