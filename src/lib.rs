//! Kanuka - share encrypted environment files through git.
//!
//! Each user holds an RSA key pair. One random project secret is wrapped
//! for every user's public key; anyone holding an envelope can unwrap it
//! and encrypt or decrypt the team's `.env` files.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── init          # Create a project
//! │   ├── create        # Generate a key and request access
//! │   ├── crypt         # encrypt / decrypt
//! │   ├── status        # Access overview
//! │   └── team          # sync / clean / revoke
//! └── core/             # Engine, no terminal I/O
//!     ├── keys          # RSA key parsing and generation
//!     ├── cipher/       # Content cipher and envelopes
//!     │   ├── mod       # Cipher trait, project secret
//!     │   ├── xchacha   # XChaCha20-Poly1305
//!     │   └── envelope  # RSA-OAEP wrap/unwrap
//!     ├── access        # active / pending / orphaned
//!     ├── select        # Target and glob selection
//!     ├── plan          # Plan and apply, with preview
//!     ├── store/        # File access
//!     │   ├── fs        # Real filesystem
//!     │   └── memory    # In-memory, for tests
//!     ├── layout        # .kanuka/ paths
//!     ├── project       # .kanuka/config.toml
//!     ├── context       # Per-invocation caller context
//!     └── vault/        # Project handle and team operations
//! ```
//!
//! # Example
//!
//! ```no_run
//! use kanuka::core::context::{Context, KeySource};
//! use kanuka::core::plan::{apply_plan, plan_operation, Mode};
//! use kanuka::core::select::{Direction, Target};
//! use kanuka::core::store::Filesystem;
//!
//! # fn main() -> kanuka::error::Result<()> {
//! let ctx = Context::new(".", "alice", KeySource::Default)?;
//! let plan = plan_operation(
//!     &Filesystem,
//!     &ctx,
//!     Direction::Encrypt,
//!     &[Target::parse(".env")],
//!     Mode::Execute,
//! )?;
//! let outcome = apply_plan(plan, &Filesystem)?;
//! assert!(outcome.is_success());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod core;
pub mod error;
