//! The primary interface for project operations.
//!
//! A [`Vault`] ties a loaded project registry to the [`Context`] of one
//! invocation and the [`Store`] it reads and writes through.

mod team;

pub use team::{CleanReport, RevokeReport, SyncReport};

use tracing::{debug, info};

use crate::core::access::{self, AccessState};
use crate::core::cipher::{envelope, ProjectSecret};
use crate::core::context::Context;
use crate::core::keys::KeyPair;
use crate::core::layout::Layout;
use crate::core::project::Project;
use crate::core::store::{Store, Visibility};
use crate::error::{AccessError, CipherError, Error, Result, ValidationError};

/// An open project.
pub struct Vault<'a, S: Store> {
    store: &'a S,
    ctx: &'a Context,
    project: Project,
}

impl<S: Store> std::fmt::Debug for Vault<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault")
            .field("root", &self.ctx.layout().root())
            .field("user", &self.ctx.user())
            .field("project", &self.project)
            .finish()
    }
}

impl<'a, S: Store> Vault<'a, S> {
    /// Open an existing project.
    ///
    /// # Errors
    ///
    /// Returns `NotFoundError::NotInitialized` if there is no registry.
    pub fn open(store: &'a S, ctx: &'a Context) -> Result<Self> {
        let project = Project::load(store, ctx.layout())?;
        Ok(Self {
            store,
            ctx,
            project,
        })
    }

    /// Initialize a new project.
    ///
    /// Generates the project secret, registers the caller under
    /// `display_name`, and writes the caller's public key and envelope, so the
    /// caller starts out active.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::AlreadyInitialized` if a registry exists.
    pub fn init(
        store: &'a S,
        ctx: &'a Context,
        mut project: Project,
        display_name: &str,
        owner: &KeyPair,
    ) -> Result<Self> {
        let layout = ctx.layout();
        if Project::exists(store, layout) {
            return Err(
                ValidationError::AlreadyInitialized(layout.root().display().to_string()).into(),
            );
        }

        info!(project = %project.uuid(), user = ctx.user(), "initializing project");

        let secret = ProjectSecret::generate();
        let wrapped = envelope::wrap(&secret, owner.public())?;
        drop(secret);

        store.write(
            &layout.public_key_path(ctx.user()),
            owner.public().to_pem()?.as_bytes(),
            Visibility::Public,
        )?;
        store.write(
            &layout.envelope_path(ctx.user()),
            &wrapped,
            Visibility::Private,
        )?;

        project.add_member(ctx.user(), display_name);
        project.save(store, layout)?;

        Ok(Self {
            store,
            ctx,
            project,
        })
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn context(&self) -> &Context {
        self.ctx
    }

    pub fn layout(&self) -> &Layout {
        self.ctx.layout()
    }

    /// Classify every user from the files currently on disk.
    pub fn access(&self) -> Result<AccessState> {
        let layout = self.layout();
        let keys = layout.public_key_ids(self.store)?;
        let envelopes = layout.envelope_ids(self.store)?;
        let state = access::resolve(Some(&self.project.users), &keys, &envelopes);

        let counts = state.counts();
        debug!(
            active = counts.active,
            pending = counts.pending,
            orphaned = counts.orphaned,
            "resolved access state"
        );
        Ok(state)
    }

    /// Load the caller's key pair.
    pub fn keypair(&self) -> Result<KeyPair> {
        self.ctx.load_keypair(self.project.uuid())
    }

    /// Unwrap the project secret with the caller's own envelope.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::NoEnvelope` if the caller has no envelope and
    /// `AccessError::EnvelopeMismatch` if `pair` cannot open it.
    pub fn unwrap_secret(&self, pair: &KeyPair) -> Result<ProjectSecret> {
        let user = self.ctx.user();
        let path = self.layout().envelope_path(user);

        if !self.store.exists(&path) {
            return Err(AccessError::NoEnvelope(user.to_string()).into());
        }

        let wrapped = self.store.read(&path)?;
        envelope::unwrap(&wrapped, pair).map_err(|e| match e {
            Error::Cipher(CipherError::Tampered(_)) => {
                AccessError::EnvelopeMismatch(user.to_string()).into()
            }
            other => other,
        })
    }

    /// Load the caller's key pair and unwrap the project secret.
    pub fn unlock(&self) -> Result<ProjectSecret> {
        let pair = self.keypair()?;
        self.unwrap_secret(&pair)
    }
}
