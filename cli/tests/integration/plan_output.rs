//! Plan (dry run) integration tests for tmirror CLI.

#[path = "../common/mod.rs"]
mod common;

use common::{T0, TestFixture};
use predicates::prelude::*;
use std::fs;

#[test]
fn test_plan_lists_copies_and_skips() {
    let fx = TestFixture::new();
    fx.write_src("new.txt", "n", T0);
    fx.write_src("stale.txt", "s", T0 + 10);
    fx.write_src("current.txt", "c", T0);
    fx.write_dst("stale.txt", "old", T0);
    fx.write_dst("current.txt", "c", T0);

    let output = fx.cmd().arg("--plan").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    assert!(stdout.contains("new.txt"));
    assert!(stdout.contains("(target missing)"));
    assert!(stdout.contains("(source newer)"));
    assert!(stdout.contains("(up to date)"));
    assert!(stdout.contains("Plan: 2 to copy, 1 to skip."));

    let copy_lines = stdout.lines().filter(|l| l.starts_with("copy ")).count();
    let skip_lines = stdout.lines().filter(|l| l.starts_with("skip ")).count();
    assert_eq!(copy_lines, 2);
    assert_eq!(skip_lines, 1);
}

#[test]
fn test_plan_changes_nothing() {
    let fx = TestFixture::new();
    fx.write_src("a/b.txt", "b", T0);
    fx.write_src("stale.txt", "new", T0 + 10);
    fx.write_dst("stale.txt", "old", T0);

    fx.cmd()
        .arg("-n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Starting sync").not())
        .stdout(predicate::str::contains("Sync completed.").not());

    assert!(!fx.dst.path().join("a").exists());
    assert_eq!(
        fs::read_to_string(fx.dst.path().join("stale.txt")).unwrap(),
        "old"
    );
    assert!(!fx.log_path().exists());
}

#[test]
fn test_dry_run_alias() {
    let fx = TestFixture::new();
    fx.write_src("f.txt", "f", T0);

    fx.cmd()
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Plan: 1 to copy, 0 to skip."));

    assert!(!fx.dst.path().join("f.txt").exists());
}

#[test]
fn test_plan_of_empty_source() {
    let fx = TestFixture::new();

    fx.cmd()
        .arg("--plan")
        .assert()
        .success()
        .stdout(predicate::str::diff("Plan: 0 to copy, 0 to skip.\n"));
}

#[test]
fn test_plan_with_missing_source_fails() {
    let fx = TestFixture::new();
    fx.write_config_for(&fx.src.path().join("absent"), fx.dst.path());

    fx.bare_cmd()
        .arg("--plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to plan"))
        .stderr(predicate::str::contains("Source path does not exist"));
}
