//! Team commands - sync, clean, revoke.

use crate::cli::{output, relative};
use crate::core::context::Context;
use crate::core::plan::Mode;
use crate::core::store::Store;
use crate::core::vault::Vault;
use crate::error::Result;

/// Grant access to every pending user.
pub fn sync(store: &impl Store, ctx: &Context, dry_run: bool) -> Result<()> {
    let vault = Vault::open(store, ctx)?;
    let report = vault.sync(Mode::from_dry_run(dry_run))?;

    for (user, reason) in &report.unusable {
        output::warn(&format!("skipped {}: {}", user, reason));
    }
    if report.granted.is_empty() {
        if report.unusable.is_empty() {
            output::success("no pending users");
        }
        return Ok(());
    }
    for user in &report.granted {
        if dry_run {
            output::warn(&format!("would grant {}", user));
        } else {
            output::success(&format!("granted {}", user));
        }
    }
    if !dry_run {
        output::hint("commit .kanuka/secrets/");
    }
    Ok(())
}

/// Remove orphaned envelopes.
pub fn clean(store: &impl Store, ctx: &Context, dry_run: bool) -> Result<()> {
    let vault = Vault::open(store, ctx)?;
    let report = vault.clean(Mode::from_dry_run(dry_run))?;

    if report.removed.is_empty() {
        output::success("nothing to clean");
        return Ok(());
    }
    for user in &report.removed {
        if dry_run {
            output::warn(&format!("would remove envelope for {}", user));
        } else {
            output::success(&format!("removed envelope for {}", user));
        }
    }
    Ok(())
}

/// Revoke a user.
pub fn revoke(store: &impl Store, ctx: &Context, user: &str, dry_run: bool) -> Result<()> {
    let mut vault = Vault::open(store, ctx)?;
    let report = vault.revoke(user, Mode::from_dry_run(dry_run))?;

    let verb = if dry_run { "would remove" } else { "removed" };
    for path in &report.removed_files {
        output::list_item(&format!("{} {}", verb, relative(ctx, path)));
    }
    if dry_run {
        output::warn(&format!("would revoke {}", user));
    } else {
        output::success(&format!("revoked {}", user));
        output::hint("the project secret is unchanged; rotate any values they could read");
    }
    Ok(())
}
