//! Core library components.
//!
//! The envelope-encryption engine: key material, the project secret and its
//! per-user envelopes, content encryption, access classification, and
//! planning of encrypt/decrypt operations. Nothing here prints or exits.

pub mod access;
pub mod cipher;
pub mod constants;
pub mod context;
pub mod keys;
pub mod layout;
pub mod plan;
pub mod project;
pub mod select;
pub mod store;
pub mod types;
pub mod vault;

pub use access::resolve;
pub use cipher::envelope::{unwrap as unwrap_secret, wrap as wrap_secret};
pub use plan::{apply_plan, plan_operation};
