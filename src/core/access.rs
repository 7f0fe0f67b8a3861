//! Access state resolution.
//!
//! Classifies every user that has a public key, an envelope, or both:
//!
//! | public key | envelope | state    |
//! |------------|----------|----------|
//! | yes        | yes      | active   |
//! | yes        | no       | pending  |
//! | no         | yes      | orphaned |
//!
//! Resolution is a pure function of the three inputs; callers supply the
//! directory listings.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::core::project::Member;
use crate::core::types::{DisplayName, UserId};

/// The derived access state of one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessStatus {
    /// Public key and envelope both present.
    Active,
    /// Public key present, waiting for an active user to wrap the secret.
    Pending,
    /// Envelope left behind without a public key; safe to delete.
    Orphaned,
}

impl fmt::Display for AccessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Pending => write!(f, "pending"),
            Self::Orphaned => write!(f, "orphaned"),
        }
    }
}

/// One row of an access report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessEntry {
    pub id: UserId,
    /// Display name from the project registry, if the user is registered.
    pub name: Option<DisplayName>,
    pub status: AccessStatus,
}

/// Per-state totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AccessCounts {
    pub active: usize,
    pub pending: usize,
    pub orphaned: usize,
}

/// Disjoint active, pending and orphaned sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessState {
    active: BTreeSet<UserId>,
    pending: BTreeSet<UserId>,
    orphaned: BTreeSet<UserId>,
    names: BTreeMap<UserId, DisplayName>,
}

impl AccessState {
    pub fn active(&self) -> &BTreeSet<UserId> {
        &self.active
    }

    pub fn pending(&self) -> &BTreeSet<UserId> {
        &self.pending
    }

    pub fn orphaned(&self) -> &BTreeSet<UserId> {
        &self.orphaned
    }

    pub fn counts(&self) -> AccessCounts {
        AccessCounts {
            active: self.active.len(),
            pending: self.pending.len(),
            orphaned: self.orphaned.len(),
        }
    }

    /// State of `id`, or `None` if it has neither a key nor an envelope.
    pub fn status_of(&self, id: &str) -> Option<AccessStatus> {
        if self.active.contains(id) {
            Some(AccessStatus::Active)
        } else if self.pending.contains(id) {
            Some(AccessStatus::Pending)
        } else if self.orphaned.contains(id) {
            Some(AccessStatus::Orphaned)
        } else {
            None
        }
    }

    /// Whether `id` has an envelope it can be expected to open.
    pub fn has_access(&self, id: &str) -> bool {
        self.active.contains(id)
    }

    /// All classified users, sorted by id.
    pub fn entries(&self) -> Vec<AccessEntry> {
        let mut entries: Vec<AccessEntry> = [
            (&self.active, AccessStatus::Active),
            (&self.pending, AccessStatus::Pending),
            (&self.orphaned, AccessStatus::Orphaned),
        ]
        .into_iter()
        .flat_map(|(ids, status)| {
            ids.iter().map(move |id| AccessEntry {
                id: id.clone(),
                name: self.names.get(id).cloned(),
                status,
            })
        })
        .collect();

        entries.sort_by(|a, b| a.id.cmp(&b.id));
        entries
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.pending.is_empty() && self.orphaned.is_empty()
    }
}

/// Classify users from the public keys and envelopes present on disk.
///
/// `registered` only contributes display names: a registered user with
/// neither file is not part of any set.
pub fn resolve(
    registered: Option<&BTreeMap<UserId, Member>>,
    public_keys: &BTreeSet<UserId>,
    envelopes: &BTreeSet<UserId>,
) -> AccessState {
    let active = public_keys.intersection(envelopes).cloned().collect();
    let pending = public_keys.difference(envelopes).cloned().collect();
    let orphaned = envelopes.difference(public_keys).cloned().collect();

    let names = registered
        .map(|members| {
            members
                .iter()
                .filter(|(id, _)| public_keys.contains(*id) || envelopes.contains(*id))
                .map(|(id, member)| (id.clone(), member.name.clone()))
                .collect()
        })
        .unwrap_or_default();

    AccessState {
        active,
        pending,
        orphaned,
        names,
    }
}
