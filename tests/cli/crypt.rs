//! Tests for `kanuka encrypt` and `kanuka decrypt`.

use crate::support::*;
use std::fs;

#[test]
fn test_encrypt_decrypt_roundtrip() {
    let t = Test::init();
    t.write(".env", SAMPLE_ENV);

    let output = t.run(&["encrypt"]);
    assert_success(&output);
    assert_stdout_contains(&output, "encrypted .env.kanuka");

    assert_encrypted(&t.path(".env.kanuka"), SAMPLE_ENV);

    fs::remove_file(t.path(".env")).unwrap();
    let output = t.run(&["decrypt"]);
    assert_success(&output);
    assert_stdout_contains(&output, "decrypted .env");
    assert_eq!(t.read(".env"), SAMPLE_ENV.as_bytes());
}

#[test]
fn test_encryption_uses_fresh_nonce() {
    let t = Test::init();
    t.write(".env", SAMPLE_ENV);
    assert_success(&t.run(&["encrypt"]));
    let first = t.read(".env.kanuka");

    fs::remove_file(t.path(".env.kanuka")).unwrap();
    assert_success(&t.run(&["encrypt"]));
    assert_ne!(t.read(".env.kanuka"), first);
}

#[test]
fn test_reencrypting_unchanged_file_keeps_ciphertext() {
    let t = Test::init();
    t.write(".env", SAMPLE_ENV_COMPLEX);
    assert_success(&t.run(&["encrypt"]));
    let sealed = t.read(".env.kanuka");

    let output = t.run(&["encrypt"]);
    assert_success(&output);
    assert_stdout_contains(&output, "unchanged");
    assert_eq!(t.read(".env.kanuka"), sealed);
}

#[test]
fn test_dry_run_writes_nothing() {
    let t = Test::init();
    t.write(".env", SAMPLE_ENV);
    t.write("api/.env.prod", "TOKEN=abc\n");
    let before = t.snapshot();

    let output = t.run(&["encrypt", "--dry-run"]);
    assert_success(&output);
    assert_stdout_contains(&output, "would encrypt");
    assert_stdout_contains(&output, ".env.kanuka (new)");
    assert_stdout_contains(&output, "2 new");
    assert_eq!(t.snapshot(), before);
}

#[test]
fn test_dry_run_reports_overwrite() {
    let t = Test::init();
    t.write(".env", SAMPLE_ENV);
    assert_success(&t.run(&["encrypt"]));
    t.write(".env", "KEY=changed\n");

    let output = t.run(&["encrypt", "--dry-run"]);
    assert_success(&output);
    assert_stdout_contains(&output, "would overwrite");
}

#[test]
fn test_dry_run_surfaces_access_errors() {
    let t = Test::init();
    t.write(".env", SAMPLE_ENV);
    let bob = User::new("bob");
    assert_success(&t.run_as(&bob, &["create"]));
    let before = t.snapshot();

    let output = t.run_as(&bob, &["encrypt", "--dry-run"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "access denied:");
    assert_eq!(t.snapshot(), before);
}

#[test]
fn test_recursive_glob() {
    let t = Test::init();
    t.write(".env.prod", "A=1\n");
    t.write("a/.env.prod", "A=2\n");
    t.write("a/.env.local", "A=3\n");

    assert_success(&t.run(&["encrypt", "**/.env.prod"]));

    assert!(t.path(".env.prod.kanuka").exists());
    assert!(t.path("a/.env.prod.kanuka").exists());
    assert!(!t.path("a/.env.local.kanuka").exists());
}

#[test]
fn test_directory_target() {
    let t = Test::init();
    t.write("svc/.env", "A=1\n");
    t.write("svc/deep/.env.test", "A=2\n");
    t.write(".env", "A=3\n");

    assert_success(&t.run(&["encrypt", "svc"]));

    assert!(t.path("svc/.env.kanuka").exists());
    assert!(t.path("svc/deep/.env.test.kanuka").exists());
    assert!(!t.path(".env.kanuka").exists());
}

#[test]
fn test_no_files_found() {
    let t = Test::init();
    let output = t.run(&["decrypt"]);
    assert_success(&output);
    assert_stdout_contains(&output, "no files found");
}

#[test]
fn test_tampered_file_fails_closed() {
    let t = Test::init();
    t.write(".env", SAMPLE_ENV);
    assert_success(&t.run(&["encrypt"]));
    fs::remove_file(t.path(".env")).unwrap();

    let mut sealed = t.read(".env.kanuka");
    let last = sealed.len() - 1;
    sealed[last] ^= 0x01;
    fs::write(t.path(".env.kanuka"), sealed).unwrap();

    let output = t.run(&["decrypt"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "decryption failed: content file");
    assert!(!t.path(".env").exists());
}

#[test]
fn test_nonce_only_file_is_decryption_error() {
    let t = Test::init();
    fs::write(t.path(".env.kanuka"), [0u8; 24]).unwrap();

    let output = t.run(&["decrypt"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "decryption failed:");
}

#[test]
fn test_private_key_from_stdin() {
    let t = Test::init();
    t.write(".env", SAMPLE_ENV);
    assert_success(&t.run(&["encrypt"]));
    fs::remove_file(t.path(".env")).unwrap();

    let key = fs::read(t.alice.private_key().unwrap()).unwrap();
    let stranger = User::new("alice");
    let output = t
        .cmd_as(&stranger)
        .args(["--private-key-stdin", "decrypt"])
        .write_stdin(key)
        .output()
        .unwrap();

    assert_success(&output);
    assert_eq!(t.read(".env"), SAMPLE_ENV.as_bytes());
}
