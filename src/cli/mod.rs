//! Command-line interface.
//!
//! Parses arguments, builds the per-invocation [`Context`], and dispatches to
//! one module per command. Commands print; the engine in [`crate::core`]
//! never does.

pub mod create;
pub mod crypt;
pub mod init;
pub mod output;
pub mod status;
pub mod team;

use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;
use zeroize::Zeroizing;

use crate::core::context::{Context, KeySource};
use crate::core::select::Direction;
use crate::core::store::Filesystem;
use crate::error::{Error, Result};

/// Kanuka - share encrypted environment files through git.
#[derive(Parser)]
#[command(
    name = "kanuka",
    about = "Share encrypted environment files through git",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Act as this user id (defaults to the OS user name)
    #[arg(long, global = true, env = "KANUKA_USER")]
    pub user: Option<String>,

    /// Project root (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Read your private key from this file
    #[arg(long, global = true, value_name = "PATH", conflicts_with = "private_key_stdin")]
    pub private_key: Option<PathBuf>,

    /// Read your private key from stdin
    #[arg(long, global = true)]
    pub private_key_stdin: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Create a project in the current directory
    Init {
        /// Project name (defaults to the directory name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Generate your key pair and request access to an existing project
    Create {
        /// Your display name
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Encrypt .env files
    Encrypt {
        /// Files, directories, or glob patterns (default: whole project)
        targets: Vec<String>,
        /// Show what would happen without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Decrypt .env.kanuka files
    Decrypt {
        /// Files, directories, or glob patterns (default: whole project)
        targets: Vec<String>,
        /// Show what would happen without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Show who has access
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Grant access to every pending user
    Sync {
        #[arg(long)]
        dry_run: bool,
    },

    /// Remove envelopes left behind by deleted public keys
    Clean {
        #[arg(long)]
        dry_run: bool,
    },

    /// Remove a user's key, envelope, and registration
    Revoke {
        /// User id to revoke
        user: String,
        #[arg(long)]
        dry_run: bool,
    },
}

/// Execute a parsed command line.
pub fn execute(cli: Cli) -> Result<()> {
    let ctx = context(&cli)?;
    debug!(root = %ctx.layout().root().display(), user = ctx.user(), "context");

    let store = Filesystem;
    match cli.command {
        Command::Init { name } => init::execute(&store, &ctx, name),
        Command::Create { name } => create::execute(&store, &ctx, name),
        Command::Encrypt { targets, dry_run } => {
            crypt::execute(&store, &ctx, Direction::Encrypt, &targets, dry_run)
        }
        Command::Decrypt { targets, dry_run } => {
            crypt::execute(&store, &ctx, Direction::Decrypt, &targets, dry_run)
        }
        Command::Status { json } => status::execute(&store, &ctx, json),
        Command::Sync { dry_run } => team::sync(&store, &ctx, dry_run),
        Command::Clean { dry_run } => team::clean(&store, &ctx, dry_run),
        Command::Revoke { user, dry_run } => team::revoke(&store, &ctx, &user, dry_run),
    }
}

fn context(cli: &Cli) -> Result<Context> {
    let root = match &cli.root {
        Some(root) => root.clone(),
        None => std::env::current_dir().map_err(|e| Error::io(".", e))?,
    };

    let user = cli.user.clone().unwrap_or_else(whoami::username);

    let key = if cli.private_key_stdin {
        let mut bytes = Zeroizing::new(Vec::new());
        std::io::stdin()
            .read_to_end(&mut bytes)
            .map_err(|e| Error::io("<stdin>", e))?;
        KeySource::Bytes(bytes)
    } else if let Some(path) = &cli.private_key {
        KeySource::File(path.clone())
    } else {
        KeySource::Default
    };

    Context::new(root, user, key)
}

/// Display `path` relative to the project root when possible.
pub(crate) fn relative(ctx: &Context, path: &std::path::Path) -> String {
    path.strip_prefix(ctx.layout().root())
        .unwrap_or(path)
        .display()
        .to_string()
}
