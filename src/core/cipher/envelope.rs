//! Envelope codec.
//!
//! Wraps the project secret for one user with RSA-OAEP (SHA-256). The
//! envelope file is the raw RSA ciphertext, so its size equals the
//! recipient's modulus size.

use rand::rngs::OsRng;
use rsa::Oaep;
use sha2::Sha256;
use tracing::debug;

use super::ProjectSecret;
use crate::core::keys::{KeyPair, PublicKey};
use crate::error::{CipherError, Result, Subject};

/// Wrap the project secret for `recipient`.
///
/// # Errors
///
/// Returns `CipherError::WrapFailed` if the key is too small to hold the
/// padded secret.
pub fn wrap(secret: &ProjectSecret, recipient: &PublicKey) -> Result<Vec<u8>> {
    let envelope = recipient
        .rsa()
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), secret.as_bytes())
        .map_err(|e| CipherError::WrapFailed(e.to_string()))?;

    let fingerprint = recipient.fingerprint()?;
    debug!(
        recipient = %fingerprint,
        envelope_len = envelope.len(),
        "wrapped project secret"
    );
    Ok(envelope)
}

/// Unwrap the project secret with the owner's private key.
///
/// # Errors
///
/// Returns `CipherError::Tampered(Subject::Envelope)` when the envelope is
/// corrupt, truncated, or was wrapped for a different key.
pub fn unwrap(envelope: &[u8], owner: &KeyPair) -> Result<ProjectSecret> {
    let plaintext = zeroize::Zeroizing::new(
        owner
            .rsa()
            .decrypt_blinded(&mut OsRng, Oaep::new::<Sha256>(), envelope)
            .map_err(|_| CipherError::Tampered(Subject::Envelope))?,
    );

    let secret = ProjectSecret::from_bytes(&plaintext)
        .ok_or(CipherError::Tampered(Subject::Envelope))?;

    let fingerprint = owner.public().fingerprint()?;
    debug!(owner = %fingerprint, "unwrapped project secret");
    Ok(secret)
}
