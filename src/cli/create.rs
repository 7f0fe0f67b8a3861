//! Create command - generate a key and request access.

use tracing::info;

use crate::cli::{init, output};
use crate::core::context::Context;
use crate::core::store::Store;
use crate::core::vault::Vault;
use crate::error::Result;

/// Register the caller in an existing project. They stay pending until an
/// active member runs `kanuka sync`.
pub fn execute(store: &impl Store, ctx: &Context, name: Option<String>) -> Result<()> {
    let mut vault = Vault::open(store, ctx)?;
    let (pair, saved_at) = init::provision_key(store, ctx, vault.project().uuid())?;

    let name = name.unwrap_or_else(whoami::realname);
    let key = vault.register(ctx.user(), &name, pair.public().to_pem()?.as_bytes())?;
    info!(user = ctx.user(), "requested access");

    output::success(&format!("registered {} (pending)", ctx.user()));
    output::kv("key", key.fingerprint()?);
    if let Some(path) = saved_at {
        output::kv("private key", output::path(path.display()));
    }
    output::hint(&format!(
        "commit .kanuka/public_keys/, then ask an active member to run: {}",
        output::cmd("kanuka sync")
    ));
    Ok(())
}
