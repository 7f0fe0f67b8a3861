//! Change planning.
//!
//! An encrypt or decrypt request runs in two steps:
//!
//! ```text
//! plan_operation ──▶ Plan ──▶ apply_plan ──▶ Outcome
//!   (validates,       (effects,  (writes,       (applied or
//!    no writes)        counts)    execute only)  partially failed)
//! ```
//!
//! Planning performs every check a real run would, including unwrapping the
//! project secret and, for decryption, authenticating every source file. A
//! preview plan stops there and cannot be applied.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::cipher::{self, ProjectSecret};
use crate::core::context::Context;
use crate::core::select::{self, Direction, Target};
use crate::core::store::{Store, Visibility};
use crate::core::vault::Vault;
use crate::error::{Error, Result, ValidationError};

/// Whether an operation may touch the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Execute,
    /// Validate and report, write nothing.
    Preview,
}

impl Mode {
    pub fn from_dry_run(dry_run: bool) -> Self {
        if dry_run {
            Self::Preview
        } else {
            Self::Execute
        }
    }

    pub fn is_preview(self) -> bool {
        self == Self::Preview
    }
}

/// What applying an effect would do to its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectStatus {
    /// Destination does not exist yet.
    New,
    /// Destination exists with different content.
    WouldOverwrite,
    /// Destination already holds this content; nothing to write.
    Unchanged,
}

impl fmt::Display for EffectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::WouldOverwrite => write!(f, "would overwrite"),
            Self::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// One planned file transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Effect {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub status: EffectStatus,
}

/// Effects per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub new: usize,
    pub would_overwrite: usize,
    pub unchanged: usize,
}

/// Where an operation ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    Planned,
    Applied,
    PartiallyFailed,
}

/// A validated operation, ready to apply in execute mode.
pub struct Plan {
    direction: Direction,
    mode: Mode,
    effects: Vec<Effect>,
    /// Held only by execute plans, until applied.
    secret: Option<ProjectSecret>,
}

impl fmt::Debug for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plan")
            .field("direction", &self.direction)
            .field("mode", &self.mode)
            .field("effects", &self.effects)
            .finish_non_exhaustive()
    }
}

impl Plan {
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn counts(&self) -> Counts {
        let mut counts = Counts::default();
        for effect in &self.effects {
            match effect.status {
                EffectStatus::New => counts.new += 1,
                EffectStatus::WouldOverwrite => counts.would_overwrite += 1,
                EffectStatus::Unchanged => counts.unchanged += 1,
            }
        }
        counts
    }

    pub fn state(&self) -> OperationState {
        OperationState::Planned
    }
}

/// An effect that could not be applied.
#[derive(Debug)]
pub struct Failure {
    pub effect: Effect,
    pub error: Error,
}

/// Per-file results of [`apply_plan`].
#[derive(Debug, Default)]
pub struct Outcome {
    pub succeeded: Vec<Effect>,
    pub failed: Vec<Failure>,
}

impl Outcome {
    /// True only if every effect was applied.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn state(&self) -> OperationState {
        if self.is_success() {
            OperationState::Applied
        } else {
            OperationState::PartiallyFailed
        }
    }
}

/// Validate a request and compute its effects.
///
/// Checks run in order: project exists, caller can unwrap the secret, targets
/// resolve, then each file. The first failure aborts the whole plan. Nothing
/// is written in either mode.
pub fn plan_operation<S: Store>(
    store: &S,
    ctx: &Context,
    direction: Direction,
    targets: &[Target],
    mode: Mode,
) -> Result<Plan> {
    let vault = Vault::open(store, ctx)?;
    let secret = vault.unlock()?;

    let sources = select::select(store, ctx.layout().root(), direction, targets)?;

    let mut effects = Vec::with_capacity(sources.len());
    for source in sources {
        let destination = direction.destination(&source);
        let status = match direction {
            Direction::Encrypt => encrypt_status(store, &secret, &source, &destination)?,
            Direction::Decrypt => decrypt_status(store, &secret, &source, &destination)?,
        };
        debug!(source = %source.display(), %status, "planned");
        effects.push(Effect {
            source,
            destination,
            status,
        });
    }

    let plan = Plan {
        direction,
        mode,
        effects,
        secret: match mode {
            Mode::Execute => Some(secret),
            Mode::Preview => None,
        },
    };

    let counts = plan.counts();
    info!(
        direction = direction.verb(),
        preview = mode.is_preview(),
        new = counts.new,
        would_overwrite = counts.would_overwrite,
        unchanged = counts.unchanged,
        "planned operation"
    );
    Ok(plan)
}

fn encrypt_status(
    store: &impl Store,
    secret: &ProjectSecret,
    source: &Path,
    destination: &Path,
) -> Result<EffectStatus> {
    let plaintext = store.read(source)?;
    if !store.exists(destination) {
        return Ok(EffectStatus::New);
    }

    // Existing ciphertext that opens to the same plaintext needs no new nonce.
    let existing = store.read(destination)?;
    match cipher::decrypt(secret, &existing) {
        Ok(current) if current == plaintext => Ok(EffectStatus::Unchanged),
        _ => Ok(EffectStatus::WouldOverwrite),
    }
}

fn decrypt_status(
    store: &impl Store,
    secret: &ProjectSecret,
    source: &Path,
    destination: &Path,
) -> Result<EffectStatus> {
    let plaintext = open(store, secret, source)?;
    if !store.exists(destination) {
        return Ok(EffectStatus::New);
    }

    if store.read(destination)? == plaintext {
        Ok(EffectStatus::Unchanged)
    } else {
        Ok(EffectStatus::WouldOverwrite)
    }
}

fn open(store: &impl Store, secret: &ProjectSecret, path: &Path) -> Result<Vec<u8>> {
    let data = store.read(path)?;
    cipher::decrypt(secret, &data).map_err(|e| match e {
        Error::Cipher(err) => err.at(path).into(),
        other => other,
    })
}

/// Perform an execute plan.
///
/// Effects are applied in order. A failure is recorded and the rest still
/// run; files already written stay written.
///
/// # Errors
///
/// Returns `ValidationError::PreviewPlan` for a preview plan.
pub fn apply_plan<S: Store>(plan: Plan, store: &S) -> Result<Outcome> {
    let direction = plan.direction;
    let secret = match (plan.mode, plan.secret) {
        (Mode::Execute, Some(secret)) => secret,
        _ => return Err(ValidationError::PreviewPlan.into()),
    };

    let mut outcome = Outcome::default();
    for effect in plan.effects {
        if effect.status == EffectStatus::Unchanged {
            outcome.succeeded.push(effect);
            continue;
        }

        match apply_effect(store, &secret, direction, &effect) {
            Ok(()) => {
                debug!(destination = %effect.destination.display(), "written");
                outcome.succeeded.push(effect);
            }
            Err(error) => {
                warn!(source = %effect.source.display(), %error, "failed");
                outcome.failed.push(Failure { effect, error });
            }
        }
    }

    info!(
        succeeded = outcome.succeeded.len(),
        failed = outcome.failed.len(),
        "applied plan"
    );
    Ok(outcome)
}

fn apply_effect(
    store: &impl Store,
    secret: &ProjectSecret,
    direction: Direction,
    effect: &Effect,
) -> Result<()> {
    let output = match direction {
        Direction::Encrypt => cipher::encrypt(secret, &store.read(&effect.source)?)?,
        Direction::Decrypt => open(store, secret, &effect.source)?,
    };
    store.write(&effect.destination, &output, Visibility::Private)
}
