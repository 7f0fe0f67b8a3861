//! XChaCha20-Poly1305 content cipher.

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::trace;

use super::{Cipher, ProjectSecret, NONCE_LEN};
use crate::error::{CipherError, Result, Subject};

/// XChaCha20-Poly1305 with a random 192-bit nonce per call.
pub struct XChaCha;

impl Cipher for XChaCha {
    fn name(&self) -> &'static str {
        "xchacha20poly1305"
    }

    fn encrypt(&self, secret: &ProjectSecret, plaintext: &[u8]) -> Result<Vec<u8>> {
        trace!(plaintext_len = plaintext.len(), "encrypting");

        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let aead = XChaCha20Poly1305::new(Key::from_slice(secret.as_bytes()));
        let sealed = aead
            .encrypt(XNonce::from_slice(&nonce), plaintext)
            .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;

        let mut out = Vec::with_capacity(NONCE_LEN + sealed.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&sealed);

        trace!(ciphertext_len = out.len(), "encrypted");
        Ok(out)
    }

    fn decrypt(&self, secret: &ProjectSecret, data: &[u8]) -> Result<Vec<u8>> {
        trace!(ciphertext_len = data.len(), "decrypting");

        if data.len() < NONCE_LEN {
            return Err(CipherError::Truncated(Subject::Content).into());
        }
        let (nonce, sealed) = data.split_at(NONCE_LEN);

        // Poly1305 verification is constant-time; nothing is released on failure.
        let aead = XChaCha20Poly1305::new(Key::from_slice(secret.as_bytes()));
        let plaintext = aead
            .decrypt(XNonce::from_slice(nonce), sealed)
            .map_err(|_| CipherError::Tampered(Subject::Content))?;

        trace!(plaintext_len = plaintext.len(), "decrypted");
        Ok(plaintext)
    }
}
