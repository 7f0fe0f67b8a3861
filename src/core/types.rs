//! Type aliases for domain concepts.

/// A user (or device) identifier.
///
/// Names the user's public key file and envelope file, so it must be a
/// single path segment. See [`crate::core::context::validate_user_id`].
pub type UserId = String;

/// A human-readable display name from the project registry.
pub type DisplayName = String;
