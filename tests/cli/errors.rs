//! Error reporting: stable prefixes, hints, exit codes.

use crate::support::*;
use predicates::prelude::*;
use std::fs;

#[test]
fn test_uninitialized_project() {
    let t = Test::new();
    t.write(".env", SAMPLE_ENV);

    t.cmd()
        .arg("encrypt")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("✗ not found: no project at"))
        .stderr(predicate::str::contains("→ run: kanuka init"));
    assert!(!t.path(".env.kanuka").exists());
}

#[test]
fn test_missing_target_is_not_found() {
    let t = Test::init();
    t.cmd()
        .args(["encrypt", ".env.missing"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("✗ not found: .env.missing"));
}

#[test]
fn test_metadata_directory_target_is_rejected() {
    let t = Test::init();
    t.write(".git/.env", SAMPLE_ENV);

    t.cmd()
        .args(["encrypt", ".git"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("✗ validation error:"));
    assert!(!t.path(".git/.env.kanuka").exists());
}

#[test]
fn test_wrong_file_kind_is_validation_error() {
    let t = Test::init();
    t.write(".env", SAMPLE_ENV);
    t.write("notes.txt", "hello");

    let output = t.run(&["decrypt", ".env"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "validation error: .env is not an encrypted");

    let output = t.run(&["encrypt", "notes.txt"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "validation error:");
}

#[test]
fn test_missing_private_key() {
    let t = Test::init();
    let key = t.alice.private_key().unwrap();
    fs::remove_file(key).unwrap();

    let output = t.run(&["decrypt"]);
    assert_error(&output, "access denied: no private key");
    assert_stderr_contains(&output, "kanuka create");
}

#[test]
fn test_garbage_private_key_is_format_error() {
    let t = Test::init();
    t.write("bad.pem", "definitely not a key");

    let output = t.run(&["--private-key", "bad.pem", "decrypt"]);
    assert_error(&output, "format error:");
}

#[test]
fn test_empty_private_key_stdin() {
    let t = Test::init();
    let output = t
        .cmd()
        .args(["--private-key-stdin", "decrypt"])
        .write_stdin("")
        .output()
        .unwrap();

    assert_failure(&output);
    assert_stderr_contains(&output, "format error: private key input is empty");
}

#[test]
fn test_wrong_private_key_is_access_denied() {
    let t = Test::init();
    let other = Test::init();
    let key = other.alice.private_key().unwrap();

    let output = t.run(&["--private-key", key.to_str().unwrap(), "decrypt"]);
    assert_error(&output, "access denied:");
    assert_stderr_contains(&output, "--private-key");
}

#[test]
fn test_invalid_user_id() {
    let t = Test::init();
    let output = t.cmd().args(["--user", "../evil", "status"]).output().unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "validation error: invalid user id");
}

#[cfg(unix)]
#[test]
fn test_partial_failure_exits_nonzero() {
    use std::os::unix::fs::PermissionsExt;

    let t = Test::init();
    t.write(".env", "A=1\n");
    t.write("locked/.env", "B=2\n");
    let locked = t.path("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

    // root ignores directory permissions
    let writable = fs::File::create(locked.join("write-check")).is_ok();
    if writable {
        let _ = fs::remove_file(locked.join("write-check"));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        eprintln!("SKIPPED: running with elevated permissions");
        return;
    }

    let output = t.run(&["encrypt"]);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_failure(&output);
    assert_stdout_contains(&output, "encrypted .env.kanuka");
    assert_stderr_contains(&output, "locked/.env: io error:");
    assert_stderr_contains(&output, "partial failure: 1 of 2 files");
    assert!(t.path(".env.kanuka").exists());
}
