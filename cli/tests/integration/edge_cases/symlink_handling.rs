//! Symlink handling integration tests for tmirror CLI.
//!
//! Links to files are followed and their content copied. Links to
//! directories are skipped with a warning. A dangling link stops the walk.

#![cfg(unix)]

use crate::common::{T0, TestFixture};
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::symlink;

#[test]
fn test_file_symlink_is_copied_as_content() {
    let fx = TestFixture::new();
    let real = fx.write_src("real.txt", "linked content", T0);
    symlink(&real, fx.src.path().join("link.txt")).unwrap();

    fx.cmd().assert().success();

    let copied = fx.dst.path().join("link.txt");
    let meta = fs::symlink_metadata(&copied).unwrap();
    assert!(!meta.file_type().is_symlink());
    assert_eq!(fs::read_to_string(&copied).unwrap(), "linked content");
    assert!(fx.dst.path().join("real.txt").is_file());
}

#[test]
fn test_symlink_to_outside_file_is_followed() {
    let fx = TestFixture::new();
    let outside = fx.work.path().join("outside.txt");
    crate::common::write_with_mtime(&outside, "outside", T0);
    symlink(&outside, fx.src.path().join("in.txt")).unwrap();

    fx.cmd().assert().success();

    assert_eq!(
        fs::read_to_string(fx.dst.path().join("in.txt")).unwrap(),
        "outside"
    );
    assert_eq!(fx.dst_mtime("in.txt"), crate::common::mtime(&outside));
}

#[test]
fn test_directory_symlink_is_skipped() {
    let fx = TestFixture::new();
    fx.write_src("real/f.txt", "f", T0);
    symlink(fx.src.path().join("real"), fx.src.path().join("alias")).unwrap();

    let mut cmd = fx.cmd();
    // Warnings are emitted at the default level even with -q
    cmd.env_remove("RUST_LOG")
        .assert()
        .success()
        .stderr(predicate::str::contains("Skipping symlink to non-file"));

    assert!(fx.dst.path().join("real/f.txt").is_file());
    assert!(!fx.dst.path().join("alias").exists());
}

#[test]
fn test_broken_symlink_stops_walk() {
    let fx = TestFixture::new();
    let dangling = fx.src.path().join("dangling");
    symlink(fx.src.path().join("nowhere"), &dangling).unwrap();

    fx.cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("Sync completed."));

    let messages = fx.log_messages();
    assert!(messages[0].starts_with("Error walking the path: "));
    assert!(messages[0].contains("dangling"));
    assert_eq!(messages.last().unwrap(), "--------------------");
}

#[test]
fn test_symlink_loop_does_not_hang() {
    let fx = TestFixture::new();
    fx.write_src("dir/f.txt", "f", T0);
    symlink(fx.src.path(), fx.src.path().join("dir/back")).unwrap();

    fx.cmd().assert().success();

    assert!(fx.dst.path().join("dir/f.txt").is_file());
    assert!(!fx.dst.path().join("dir/back").exists());
}
