//! Cryptographic operations.
//!
//! Two layers:
//!
//! - **Content**: authenticated encryption of file contents under the
//!   project secret ([`Cipher`], implemented by [`XChaCha`]).
//! - **Envelope**: wrapping the project secret for each user's RSA public key
//!   ([`envelope::wrap`] / [`envelope::unwrap`]).
//!
//! Content files are `nonce ∥ ciphertext ∥ tag`. A project uses exactly one
//! content cipher, so nonce length is a crate constant rather than a property
//! of each file.

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::Result;

pub mod envelope;
mod xchacha;

pub use xchacha::XChaCha;

/// Length of the project secret in bytes.
pub const SECRET_LEN: usize = 32;

/// Length of the per-file random nonce in bytes.
pub const NONCE_LEN: usize = 24;

/// Length of the authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Content cipher trait.
///
/// Implementations must be AEADs with a [`NONCE_LEN`]-byte nonce that is
/// generated fresh on every `encrypt` call and prepended to the output.
pub trait Cipher {
    /// Encrypt `plaintext`, returning `nonce ∥ ciphertext ∥ tag`.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::EncryptionFailed` if the AEAD rejects the input.
    fn encrypt(&self, secret: &ProjectSecret, plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Decrypt `nonce ∥ ciphertext ∥ tag`.
    ///
    /// No plaintext is returned unless the tag verifies.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::Truncated` if the input is shorter than the nonce
    /// and `CipherError::Tampered` if authentication fails.
    fn decrypt(&self, secret: &ProjectSecret, data: &[u8]) -> Result<Vec<u8>>;

    /// Backend name for display.
    fn name(&self) -> &'static str;
}

/// The project's symmetric secret.
///
/// Generated once per project, never written to disk unwrapped, and wiped
/// from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ProjectSecret {
    bytes: [u8; SECRET_LEN],
}

impl ProjectSecret {
    /// Generate a new random secret.
    pub fn generate() -> Self {
        let mut bytes = [0u8; SECRET_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Create a secret from exactly [`SECRET_LEN`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let bytes: [u8; SECRET_LEN] = bytes.try_into().ok()?;
        Some(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8; SECRET_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for ProjectSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProjectSecret([REDACTED])")
    }
}

/// Encrypt content under the project secret.
///
/// This is a convenience wrapper around `XChaCha::encrypt`.
pub fn encrypt(secret: &ProjectSecret, plaintext: &[u8]) -> Result<Vec<u8>> {
    XChaCha.encrypt(secret, plaintext)
}

/// Decrypt content under the project secret.
///
/// This is a convenience wrapper around `XChaCha::decrypt`.
pub fn decrypt(secret: &ProjectSecret, data: &[u8]) -> Result<Vec<u8>> {
    XChaCha.decrypt(secret, data)
}
