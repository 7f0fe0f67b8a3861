//! Test fixtures and constants.

/// A typical .env file.
pub const SAMPLE_ENV: &str = "KEY=value\n";

/// A multi-line .env with comments and quoting.
pub const SAMPLE_ENV_COMPLEX: &str = r#"
# Database
DATABASE_URL=postgres://localhost/mydb
API_KEY="sk-test-12345"
EMPTY=
SPECIAL_CHARS=p@ssw0rd!#$%
"#;

