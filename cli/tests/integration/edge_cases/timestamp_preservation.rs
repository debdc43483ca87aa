//! Timestamp preservation integration tests for tmirror CLI.
//!
//! Copied files carry the source access and modification times, so the
//! next run sees them as up to date.

use crate::common::{self, T0, TestFixture};
use filetime::FileTime;
use std::fs;

fn atime(path: &std::path::Path) -> FileTime {
    FileTime::from_last_access_time(&fs::metadata(path).expect("Failed to get metadata"))
}

#[test]
fn test_modification_time_preserved() {
    let fx = TestFixture::new();
    fx.write_src("f.txt", "content", T0 - 86_400);

    fx.cmd().assert().success();

    assert_eq!(
        fx.dst_mtime("f.txt"),
        FileTime::from_unix_time(T0 - 86_400, 0)
    );
}

#[test]
fn test_access_time_preserved() {
    let fx = TestFixture::new();
    let src = fx.write_src("f.txt", "content", T0);
    filetime::set_file_times(
        &src,
        FileTime::from_unix_time(T0 + 500, 0),
        FileTime::from_unix_time(T0, 0),
    )
    .unwrap();

    fx.cmd().assert().success();

    let dst = fx.dst.path().join("f.txt");
    assert_eq!(atime(&dst), FileTime::from_unix_time(T0 + 500, 0));
    assert_eq!(common::mtime(&dst), FileTime::from_unix_time(T0, 0));
}

#[test]
fn test_subsecond_mtime_preserved() {
    let fx = TestFixture::new();
    let src = fx.write_src("f.txt", "content", T0);
    let precise = FileTime::from_unix_time(T0, 123_456_789);
    filetime::set_file_mtime(&src, precise).unwrap();

    fx.cmd().assert().success();

    // Filesystems with coarser granularity round both sides the same way
    assert_eq!(fx.dst_mtime("f.txt"), common::mtime(&src));
}

#[test]
fn test_in_place_copy_preserves_times() {
    let fx = TestFixture::new();
    fx.write_src("f.txt", "new", T0 + 30);
    fx.write_dst("f.txt", "old", T0);

    fx.cmd().arg("--in-place").assert().success();

    assert_eq!(fx.dst_mtime("f.txt"), FileTime::from_unix_time(T0 + 30, 0));
}

#[test]
fn test_directory_times_are_not_copied() {
    let fx = TestFixture::new();
    fx.write_src("dir/f.txt", "f", T0);
    filetime::set_file_mtime(fx.src.path().join("dir"), FileTime::from_unix_time(T0, 0)).unwrap();

    fx.cmd().assert().success();

    // The target directory was created by this run, so it is newer
    assert!(common::mtime(&fx.dst.path().join("dir")) > FileTime::from_unix_time(T0, 0));
}
