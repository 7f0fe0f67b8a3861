//! Status command - show who has access.

use serde::Serialize;
use uuid::Uuid;

use crate::cli::output;
use crate::core::access::{AccessCounts, AccessEntry, AccessStatus};
use crate::core::context::Context;
use crate::core::store::Store;
use crate::core::vault::Vault;
use crate::error::{ConfigError, Result};

#[derive(Serialize)]
struct Report<'a> {
    project: &'a str,
    uuid: Uuid,
    user: &'a str,
    status: Option<AccessStatus>,
    counts: AccessCounts,
    users: Vec<AccessEntry>,
}

/// Print the access state of every user.
pub fn execute(store: &impl Store, ctx: &Context, json: bool) -> Result<()> {
    let vault = Vault::open(store, ctx)?;
    let state = vault.access()?;

    let report = Report {
        project: vault.project().name(),
        uuid: vault.project().uuid(),
        user: ctx.user(),
        status: state.status_of(ctx.user()),
        counts: state.counts(),
        users: state.entries(),
    };

    if json {
        let text = serde_json::to_string_pretty(&report).map_err(ConfigError::Json)?;
        println!("{}", text);
        return Ok(());
    }

    output::header(report.project);
    output::kv("uuid", report.uuid);
    output::kv(
        "you",
        match report.status {
            Some(status) => format!("{} ({})", report.user, status),
            None => format!("{} (not registered)", report.user),
        },
    );
    output::kv(
        "users",
        format!(
            "{} active, {} pending, {} orphaned",
            report.counts.active, report.counts.pending, report.counts.orphaned
        ),
    );

    if !report.users.is_empty() {
        println!();
        for entry in &report.users {
            match &entry.name {
                Some(name) => {
                    output::list_item(&format!("{} ({}) {}", entry.id, name, entry.status))
                }
                None => output::list_item(&format!("{} {}", entry.id, entry.status)),
            }
        }
    }

    if report.counts.pending > 0 {
        output::hint(&format!("grant pending users: {}", output::cmd("kanuka sync")));
    }
    if report.counts.orphaned > 0 {
        output::hint(&format!("remove orphans: {}", output::cmd("kanuka clean")));
    }
    Ok(())
}
