//! Init command - create a project.

use std::path::PathBuf;

use tracing::info;
use uuid::Uuid;

use crate::cli::output;
use crate::core::context::{default_key_path, Context, KeySource};
use crate::core::keys::KeyPair;
use crate::core::project::Project;
use crate::core::store::{Store, Visibility};
use crate::core::vault::Vault;
use crate::error::{Result, ValidationError};

/// Create a project owned by the caller.
pub fn execute(store: &impl Store, ctx: &Context, name: Option<String>) -> Result<()> {
    let layout = ctx.layout();
    if Project::exists(store, layout) {
        return Err(
            ValidationError::AlreadyInitialized(layout.root().display().to_string()).into(),
        );
    }

    let name = name
        .or_else(|| {
            layout
                .root()
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "project".to_string());

    let project = Project::new(name.as_str());
    let (pair, saved_at) = provision_key(store, ctx, project.uuid())?;
    let fingerprint = pair.public().fingerprint()?;
    let uuid = project.uuid();

    let vault = Vault::init(store, ctx, project, &whoami::realname(), &pair)?;
    info!(project = %uuid, "initialized");

    output::success(&format!("initialized {}", vault.project().name()));
    output::kv("user", ctx.user());
    output::kv("key", fingerprint);
    if let Some(path) = saved_at {
        output::kv("private key", output::path(path.display()));
    }
    output::hint(&format!(
        "commit .kanuka/, then run: {}",
        output::cmd("kanuka encrypt")
    ));
    Ok(())
}

/// Get the caller's key pair for project `uuid`.
///
/// With the default key source an existing key is reused; otherwise a new
/// one is generated and saved. Returns where it was saved, if anywhere.
pub(crate) fn provision_key(
    store: &impl Store,
    ctx: &Context,
    uuid: Uuid,
) -> Result<(KeyPair, Option<PathBuf>)> {
    if !matches!(ctx.key_source(), KeySource::Default) {
        return Ok((ctx.load_keypair(uuid)?, None));
    }

    let path = default_key_path(uuid)?;
    if store.exists(&path) {
        info!(path = %path.display(), "reusing existing private key");
        return Ok((ctx.load_keypair(uuid)?, Some(path)));
    }

    output::dimmed("generating RSA key pair...");
    let pair = KeyPair::generate()?;
    store.write(&path, pair.to_pem()?.as_bytes(), Visibility::Private)?;
    info!(path = %path.display(), "saved private key");
    Ok((pair, Some(path)))
}
