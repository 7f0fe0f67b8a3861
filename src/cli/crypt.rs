//! Encrypt and decrypt commands.

use tracing::info;

use crate::cli::{output, relative};
use crate::core::context::Context;
use crate::core::plan::{apply_plan, plan_operation, EffectStatus, Mode};
use crate::core::select::{Direction, Target};
use crate::core::store::Store;
use crate::error::{Error, Result};

/// Plan, then apply unless `dry_run`.
pub fn execute(
    store: &impl Store,
    ctx: &Context,
    direction: Direction,
    targets: &[String],
    dry_run: bool,
) -> Result<()> {
    let targets: Vec<Target> = targets.iter().map(|t| Target::parse(t)).collect();
    let mode = Mode::from_dry_run(dry_run);
    info!(direction = direction.verb(), dry_run, "running");

    let plan = plan_operation(store, ctx, direction, &targets, mode)?;
    if plan.is_empty() {
        output::dimmed("no files found");
        return Ok(());
    }

    if mode.is_preview() {
        output::header(&format!("would {}:", direction.verb()));
        for effect in plan.effects() {
            output::list_item(&format!(
                "{} -> {} ({})",
                relative(ctx, &effect.source),
                relative(ctx, &effect.destination),
                effect.status
            ));
        }
        let counts = plan.counts();
        output::dimmed(&format!(
            "{} new, {} would overwrite, {} unchanged (dry run, nothing written)",
            counts.new, counts.would_overwrite, counts.unchanged
        ));
        return Ok(());
    }

    let total = plan.effects().len();
    let outcome = apply_plan(plan, store)?;

    for effect in &outcome.succeeded {
        let label = match effect.status {
            EffectStatus::Unchanged => "unchanged",
            _ => past_tense(direction),
        };
        output::success(&format!(
            "{} {}",
            label,
            output::path(relative(ctx, &effect.destination))
        ));
    }
    for failure in &outcome.failed {
        output::error(&format!(
            "{}: {}",
            relative(ctx, &failure.effect.source),
            failure.error
        ));
    }

    if outcome.is_success() {
        Ok(())
    } else {
        Err(Error::Partial {
            failed: outcome.failed.len(),
            total,
        })
    }
}

fn past_tense(direction: Direction) -> &'static str {
    match direction {
        Direction::Encrypt => "encrypted",
        Direction::Decrypt => "decrypted",
    }
}
