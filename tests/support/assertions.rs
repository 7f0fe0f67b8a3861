//! Assertions over kanuka's process output and on-disk artifacts.

use std::path::Path;
use std::process::Output;

use predicates::prelude::*;

/// Nonce plus tag: the smallest valid encrypted file.
pub const MIN_CIPHERTEXT_LEN: usize = 24 + 16;

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Exit status 0, showing stderr otherwise.
pub fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "kanuka failed ({:?}):\n{}",
        output.status.code(),
        stderr(output)
    );
}

/// Exit status 1, the only failure code kanuka uses.
pub fn assert_failure(output: &Output) {
    assert_eq!(
        output.status.code(),
        Some(1),
        "expected exit code 1, stdout: {}",
        stdout(output)
    );
}

pub fn assert_stdout_contains(output: &Output, expected: &str) {
    let out = stdout(output);
    assert!(
        predicate::str::contains(expected).eval(&out),
        "stdout missing '{}', got: {}",
        expected,
        out
    );
}

pub fn assert_stderr_contains(output: &Output, expected: &str) {
    let err = stderr(output);
    assert!(
        predicate::str::contains(expected).eval(&err),
        "stderr missing '{}', got: {}",
        expected,
        err
    );
}

/// Failed with a `✗ <prefix>` line on stderr.
pub fn assert_error(output: &Output, prefix: &str) {
    assert_failure(output);
    assert_stderr_contains(output, &format!("✗ {}", prefix));
}

/// `path` holds ciphertext, not `plaintext`.
pub fn assert_encrypted(path: &Path, plaintext: &str) {
    let bytes = std::fs::read(path).unwrap_or_else(|e| panic!("{}: {}", path.display(), e));
    assert_eq!(
        bytes.len(),
        plaintext.len() + MIN_CIPHERTEXT_LEN,
        "{} has the wrong length for its plaintext",
        path.display()
    );
    let text = String::from_utf8_lossy(&bytes);
    for line in plaintext.lines().filter(|l| l.len() > 4) {
        assert!(
            !text.contains(line),
            "{} leaks plaintext line '{}'",
            path.display(),
            line
        );
    }
}
