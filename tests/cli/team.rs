//! Tests for `status`, `sync`, `clean`, and `revoke`.

use crate::support::*;
use predicates::prelude::*;
use std::fs;

#[test]
fn test_sync_grants_pending_user() {
    let t = Test::init();
    t.write(".env", SAMPLE_ENV);
    assert_success(&t.run(&["encrypt"]));

    let bob = User::new("bob");
    assert_success(&t.run_as(&bob, &["create"]));

    let output = t.run_as(&bob, &["decrypt"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "access denied: no access envelope for user 'bob'");
    assert_stderr_contains(&output, "kanuka sync");

    let output = t.run(&["sync", "--dry-run"]);
    assert_success(&output);
    assert_stdout_contains(&output, "would grant bob");
    assert!(!t.path(".kanuka/secrets/bob.kanuka").exists());

    let output = t.run(&["sync"]);
    assert_success(&output);
    assert_stdout_contains(&output, "granted bob");

    fs::remove_file(t.path(".env")).unwrap();
    assert_success(&t.run_as(&bob, &["decrypt"]));
    assert_eq!(t.read(".env"), SAMPLE_ENV.as_bytes());

    let output = t.run(&["sync"]);
    assert_success(&output);
    assert_stdout_contains(&output, "no pending users");
}

#[test]
fn test_sync_skips_unusable_public_key() {
    let t = Test::init();
    let bob = User::new("bob");
    assert_success(&t.run_as(&bob, &["create"]));
    t.write(
        ".kanuka/public_keys/dave.pub",
        "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8g dave\n",
    );

    t.cmd()
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("skipped dave: format error:"))
        .stdout(predicate::str::contains("granted bob"));

    assert!(t.path(".kanuka/secrets/bob.kanuka").exists());
    assert!(!t.path(".kanuka/secrets/dave.kanuka").exists());
}

#[test]
fn test_pending_user_cannot_sync() {
    let t = Test::init();
    let bob = User::new("bob");
    let carol = User::new("carol");
    assert_success(&t.run_as(&bob, &["create"]));
    assert_success(&t.run_as(&carol, &["create"]));

    let output = t.run_as(&bob, &["sync"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "access denied:");
    assert!(!t.path(".kanuka/secrets/carol.kanuka").exists());
}

#[test]
fn test_status_reports_states() {
    let t = Test::init();
    let bob = User::new("bob");
    assert_success(&t.run_as(&bob, &["create", "--name", "Bob"]));
    fs::write(t.path(".kanuka/secrets/ghost.kanuka"), [7u8; 256]).unwrap();

    let output = t.run(&["status"]);
    assert_success(&output);
    assert_stdout_contains(&output, "app");
    assert_stdout_contains(&output, "alice (active)");
    assert_stdout_contains(&output, "bob (Bob) pending");
    assert_stdout_contains(&output, "ghost orphaned");
    assert_stdout_contains(&output, "1 active, 1 pending, 1 orphaned");
    assert_stderr_contains(&output, "kanuka sync");
    assert_stderr_contains(&output, "kanuka clean");
}

#[test]
fn test_status_json() {
    let t = Test::init();
    let bob = User::new("bob");
    assert_success(&t.run_as(&bob, &["create"]));

    let output = t.run_as(&bob, &["status", "--json"]);
    assert_success(&output);

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["project"], "app");
    assert_eq!(report["user"], "bob");
    assert_eq!(report["status"], "pending");
    assert_eq!(report["counts"]["active"], 1);
    assert_eq!(report["counts"]["pending"], 1);
    assert_eq!(report["users"].as_array().unwrap().len(), 2);
}

#[test]
fn test_clean_removes_only_orphans() {
    let t = Test::init();
    let bob = User::new("bob");
    assert_success(&t.run_as(&bob, &["create"]));
    fs::write(t.path(".kanuka/secrets/ghost.kanuka"), [7u8; 256]).unwrap();

    let output = t.run(&["clean", "--dry-run"]);
    assert_success(&output);
    assert_stdout_contains(&output, "would remove envelope for ghost");
    assert!(t.path(".kanuka/secrets/ghost.kanuka").exists());

    let output = t.run(&["clean"]);
    assert_success(&output);
    assert_stdout_contains(&output, "removed envelope for ghost");
    assert!(!t.path(".kanuka/secrets/ghost.kanuka").exists());
    assert!(t.path(".kanuka/secrets/alice.kanuka").exists());
    assert!(t.path(".kanuka/public_keys/bob.pub").exists());

    let output = t.run(&["clean"]);
    assert_success(&output);
    assert_stdout_contains(&output, "nothing to clean");
}

#[test]
fn test_revoke_removes_access() {
    let t = Test::init();
    t.write(".env", SAMPLE_ENV);
    assert_success(&t.run(&["encrypt"]));
    let bob = User::new("bob");
    t.admit(&bob);

    let output = t.run(&["revoke", "bob", "--dry-run"]);
    assert_success(&output);
    assert_stdout_contains(&output, "would revoke bob");
    assert!(t.path(".kanuka/public_keys/bob.pub").exists());

    let output = t.run(&["revoke", "bob"]);
    assert_success(&output);
    assert_stdout_contains(&output, "revoked bob");
    assert!(!t.path(".kanuka/public_keys/bob.pub").exists());
    assert!(!t.path(".kanuka/secrets/bob.kanuka").exists());

    let config = fs::read_to_string(t.path(".kanuka/config.toml")).unwrap();
    assert!(!config.contains("[users.bob]"));

    let output = t.run_as(&bob, &["decrypt"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "access denied:");

    let output = t.run(&["revoke", "bob"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "not found: user 'bob'");
}
