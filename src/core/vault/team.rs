//! Team operations.
//!
//! Register users, grant pending users access, clean up orphaned envelopes,
//! and revoke users.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use super::Vault;
use crate::core::cipher::envelope;
use crate::core::context::validate_user_id;
use crate::core::keys::{self, PublicKey};
use crate::core::plan::Mode;
use crate::core::store::{Store, Visibility};
use crate::core::types::UserId;
use crate::error::{AccessError, CipherError, Error, NotFoundError, Result, ValidationError};

/// Result of a sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Pending users that were (or in preview, would be) granted access.
    pub granted: Vec<UserId>,
    /// Pending users whose public key could not be used; left pending.
    pub unusable: Vec<(UserId, String)>,
}

/// Result of a clean.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// Orphaned users whose envelopes were (or would be) removed.
    pub removed: Vec<UserId>,
}

/// Result of a revoke.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevokeReport {
    /// Files that were (or would be) deleted.
    pub removed_files: Vec<PathBuf>,
    /// Whether the user was dropped from the registry.
    pub unregistered: bool,
}

impl<S: Store> Vault<'_, S> {
    /// Register a user by their public key.
    ///
    /// The user becomes pending until an active user runs [`Vault::sync`].
    ///
    /// # Errors
    ///
    /// Returns a `KeyError` if `public_key` does not parse and
    /// `ValidationError::UserExists` if the user already has a key here.
    pub fn register(&mut self, id: &str, name: &str, public_key: &[u8]) -> Result<PublicKey> {
        validate_user_id(id)?;
        let key = keys::parse_public_key(public_key)?;

        let path = self.layout().public_key_path(id);
        if self.store.exists(&path) {
            return Err(ValidationError::UserExists(id.to_string()).into());
        }

        let fingerprint = key.fingerprint()?;
        info!(user = id, fingerprint = %fingerprint, "registering user");

        self.store
            .write(&path, key.to_pem()?.as_bytes(), Visibility::Public)?;
        self.project.add_member(id, name);
        self.project.save(self.store, self.ctx.layout())?;

        Ok(key)
    }

    /// Wrap the project secret for every pending user.
    ///
    /// The caller must be active and their registered public key must match
    /// their private key. Every pending key is parsed and wrapped before
    /// anything is written; preview stops there. A pending key that does not
    /// parse or cannot hold an envelope is reported as unusable and skipped.
    pub fn sync(&self, mode: Mode) -> Result<SyncReport> {
        let state = self.access()?;
        if state.pending().is_empty() {
            debug!("no pending users");
            return Ok(SyncReport::default());
        }

        let pair = self.keypair()?;
        let user = self.ctx.user();
        let own_key_path = self.layout().public_key_path(user);
        if self.store.exists(&own_key_path) {
            let registered = keys::parse_public_key(&self.store.read(&own_key_path)?)?;
            if !registered.matches(&pair) {
                return Err(AccessError::KeyMismatch(user.to_string()).into());
            }
        }
        let secret = self.unwrap_secret(&pair)?;

        let mut sealed = Vec::with_capacity(state.pending().len());
        let mut unusable = Vec::new();
        for id in state.pending() {
            let pem = self.store.read(&self.layout().public_key_path(id))?;
            let wrapped = keys::parse_public_key(&pem).and_then(|key| envelope::wrap(&secret, &key));
            match wrapped {
                Ok(wrapped) => sealed.push((id.clone(), wrapped)),
                Err(err @ (Error::Key(_) | Error::Cipher(CipherError::WrapFailed(_)))) => {
                    warn!(user = %id, error = %err, "skipping unusable public key");
                    unusable.push((id.clone(), err.to_string()));
                }
                Err(err) => return Err(err),
            }
        }
        drop(secret);

        if mode == Mode::Execute {
            for (id, wrapped) in &sealed {
                self.store
                    .write(&self.layout().envelope_path(id), wrapped, Visibility::Private)?;
                info!(user = %id, "granted access");
            }
        }

        Ok(SyncReport {
            granted: sealed.into_iter().map(|(id, _)| id).collect(),
            unusable,
        })
    }

    /// Remove every orphaned envelope.
    ///
    /// Never touches active or pending users; a second run removes nothing.
    pub fn clean(&self, mode: Mode) -> Result<CleanReport> {
        let state = self.access()?;
        let removed: Vec<UserId> = state.orphaned().iter().cloned().collect();

        if mode == Mode::Execute {
            for id in &removed {
                self.store.remove(&self.layout().envelope_path(id))?;
                info!(user = %id, "removed orphaned envelope");
            }
        }

        Ok(CleanReport { removed })
    }

    /// Remove a user's public key, envelope, and registry entry.
    ///
    /// # Errors
    ///
    /// Returns `NotFoundError::User` if the user has none of these.
    pub fn revoke(&mut self, id: &str, mode: Mode) -> Result<RevokeReport> {
        validate_user_id(id)?;

        let removed_files: Vec<PathBuf> = [
            self.layout().public_key_path(id),
            self.layout().envelope_path(id),
        ]
        .into_iter()
        .filter(|path| self.store.exists(path))
        .collect();
        let unregistered = self.project.users.contains_key(id);

        if removed_files.is_empty() && !unregistered {
            return Err(NotFoundError::User(id.to_string()).into());
        }

        if mode == Mode::Execute {
            for path in &removed_files {
                self.store.remove(path)?;
            }
            if self.project.remove_member(id) {
                self.project.save(self.store, self.ctx.layout())?;
            }
            info!(user = id, files = removed_files.len(), "revoked user");
        }

        Ok(RevokeReport {
            removed_files,
            unregistered,
        })
    }
}
