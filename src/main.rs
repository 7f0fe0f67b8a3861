//! Kanuka - share encrypted environment files through git.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kanuka::cli::output;
use kanuka::cli::{execute, Cli};
use kanuka::error::{AccessError, Error, NotFoundError};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("KANUKA_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("kanuka=debug")
        } else {
            EnvFilter::new("kanuka=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    if let Err(e) = execute(cli) {
        output::error(&e.to_string());
        if let Some(hint) = suggestion(&e) {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}

fn suggestion(e: &Error) -> Option<&'static str> {
    match e {
        Error::NotFound(NotFoundError::NotInitialized(_)) => Some("run: kanuka init"),
        Error::Access(AccessError::NoPrivateKey(_)) => {
            Some("run: kanuka create, or pass --private-key")
        }
        Error::Access(AccessError::NoEnvelope(_)) => {
            Some("ask an active member to run: kanuka sync")
        }
        Error::Access(AccessError::EnvelopeMismatch(_) | AccessError::KeyMismatch(_)) => {
            Some("check that --private-key points at the key you registered")
        }
        Error::Partial { .. } => Some("files already written were kept; rerun to retry"),
        _ => None,
    }
}
