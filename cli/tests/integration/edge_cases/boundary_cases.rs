//! Boundary condition integration tests for tmirror CLI.

use crate::common::{T0, TestFixture};
use std::fs;

#[test]
fn test_empty_source() {
    let fx = TestFixture::new();

    fx.cmd().assert().success();

    assert_eq!(fx.count_files_recursive(fx.dst.path()), 0);
    assert_eq!(fx.log_messages(), vec!["--------------------"]);
}

#[test]
fn test_empty_file() {
    let fx = TestFixture::new();
    fx.write_src("empty.txt", "", T0);

    fx.cmd().assert().success();

    let copied = fx.dst.path().join("empty.txt");
    assert!(copied.is_file());
    assert_eq!(fs::metadata(&copied).unwrap().len(), 0);
}

#[test]
fn test_large_file() {
    let fx = TestFixture::new();
    let content: Vec<u8> = (0..5 * 1024 * 1024).map(|i| (i % 251) as u8).collect();
    let src = fx.src.path().join("large.bin");
    fs::write(&src, &content).unwrap();

    fx.cmd().assert().success();

    assert_eq!(fs::read(fx.dst.path().join("large.bin")).unwrap(), content);
}

#[test]
fn test_unicode_and_spaces_in_names() {
    let fx = TestFixture::new();
    let names = [
        "文件.txt",
        "with space.txt",
        "émoji 🎉.txt",
        "dir ñ/inner ü.txt",
    ];
    for name in names {
        fx.write_src(name, name, T0);
    }

    fx.cmd().assert().success();

    for name in names {
        assert_eq!(fs::read_to_string(fx.dst.path().join(name)).unwrap(), name);
    }
    assert!(fx
        .log_messages()
        .contains(&"Copied: inner ü.txt".to_owned()));
}

#[test]
fn test_hidden_files_are_mirrored() {
    let fx = TestFixture::new();
    fx.write_src(".hidden", "h", T0);
    fx.write_src(".config/settings", "s", T0);

    fx.cmd().assert().success();

    assert!(fx.dst.path().join(".hidden").is_file());
    assert!(fx.dst.path().join(".config/settings").is_file());
}

#[test]
fn test_target_created_when_missing() {
    let fx = TestFixture::new();
    fx.write_src("a/b.txt", "b", T0);
    let target = fx.dst.path().join("not/yet/there");
    fx.write_config_for(fx.src.path(), &target);

    fx.bare_cmd().assert().success();

    assert_eq!(fs::read_to_string(target.join("a/b.txt")).unwrap(), "b");
}

#[test]
fn test_same_name_in_different_directories() {
    let fx = TestFixture::new();
    fx.write_src("one/readme.md", "1", T0);
    fx.write_src("two/readme.md", "2", T0);

    fx.cmd().assert().success();

    assert_eq!(
        fs::read_to_string(fx.dst.path().join("one/readme.md")).unwrap(),
        "1"
    );
    assert_eq!(
        fs::read_to_string(fx.dst.path().join("two/readme.md")).unwrap(),
        "2"
    );
    let copied: Vec<String> = fx
        .log_messages()
        .into_iter()
        .filter(|m| m.starts_with("Copied: "))
        .collect();
    assert_eq!(copied, vec!["Copied: readme.md", "Copied: readme.md"]);
}
