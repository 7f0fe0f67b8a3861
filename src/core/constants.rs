//! Constants used throughout kanuka.
//!
//! Centralizes the on-disk naming convention and fixed sizes.

/// Project metadata directory, relative to the project root.
pub const KANUKA_DIR: &str = ".kanuka";

/// Project registry file inside [`KANUKA_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

/// Directory of per-user public keys inside [`KANUKA_DIR`].
pub const PUBLIC_KEYS_DIR: &str = "public_keys";

/// Directory of per-user envelopes inside [`KANUKA_DIR`].
pub const SECRETS_DIR: &str = "secrets";

/// Extension of a public key file (`<user>.pub`).
pub const PUBLIC_KEY_EXT: &str = "pub";

/// Extension of an envelope file (`<user>.kanuka`).
pub const ENVELOPE_EXT: &str = "kanuka";

/// Suffix appended to a plaintext file to name its ciphertext sibling.
pub const CIPHERTEXT_SUFFIX: &str = ".kanuka";

/// Plaintext content files are named `.env`, `.env.local`, `.env.prod`, ...
pub const CONTENT_PREFIX: &str = ".env";

/// Directories never descended into when scanning for content files.
pub const SKIPPED_DIRS: &[&str] = &[KANUKA_DIR, ".git"];

/// Private key file name inside the per-project key directory.
pub const PRIVATE_KEY_FILE: &str = "privkey";

/// Key directory under the user's data dir (`<data_dir>/kanuka/keys`).
pub const KEY_DIR: &str = "kanuka/keys";
