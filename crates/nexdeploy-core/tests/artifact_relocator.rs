mod support;

use std::fs;

use nexdeploy_core::deploy::relocate_artifacts;

use support::{file_names, write_file};

#[test]
fn moves_only_js_files_into_target() {
    let tmp = tempfile::tempdir().expect("tempdir should succeed");
    let src_dir = tmp.path().join("src/form");
    write_file(&src_dir.join("main.xfdl"), "<FDL/>");
    write_file(&src_dir.join("main.xfdl.js"), "generated");
    write_file(&src_dir.join("util.xjs"), "source");
    let target = tmp.path().join("out/form");

    let report = relocate_artifacts(&src_dir.join("main.xfdl"), &target)
        .expect("relocation should succeed");

    assert_eq!(report.moved, vec![target.join("main.xfdl.js")]);
    assert_eq!(file_names(&target), vec!["main.xfdl.js"]);
    assert_eq!(file_names(&src_dir), vec!["main.xfdl", "util.xjs"]);
}

#[test]
fn overwrites_existing_destination() {
    let tmp = tempfile::tempdir().expect("tempdir should succeed");
    let src_dir = tmp.path().join("src");
    write_file(&src_dir.join("a.xfdl"), "");
    write_file(&src_dir.join("a.xfdl.js"), "new");
    let target = tmp.path().join("out");
    write_file(&target.join("a.xfdl.js"), "old");

    relocate_artifacts(&src_dir.join("a.xfdl"), &target).expect("relocation should succeed");

    assert_eq!(
        fs::read_to_string(target.join("a.xfdl.js")).expect("read"),
        "new"
    );
    assert!(!src_dir.join("a.xfdl.js").exists());
}

#[test]
fn target_equal_to_source_dir_is_a_no_op() {
    let tmp = tempfile::tempdir().expect("tempdir should succeed");
    let dir = tmp.path().join("same");
    write_file(&dir.join("a.xfdl"), "");
    write_file(&dir.join("a.xfdl.js"), "kept");

    let report = relocate_artifacts(&dir.join("a.xfdl"), &dir.join("./")).expect("no-op");

    assert!(report.moved.is_empty());
    assert_eq!(fs::read_to_string(dir.join("a.xfdl.js")).expect("read"), "kept");
}

#[test]
fn missing_source_dir_is_a_no_op() {
    let tmp = tempfile::tempdir().expect("tempdir should succeed");
    let target = tmp.path().join("out");

    let report = relocate_artifacts(&tmp.path().join("gone/a.xfdl"), &target)
        .expect("missing source dir is not an error");

    assert!(report.moved.is_empty());
    assert!(!target.exists());
}

#[test]
fn creates_target_even_without_artifacts() {
    let tmp = tempfile::tempdir().expect("tempdir should succeed");
    write_file(&tmp.path().join("src/a.xfdl"), "");
    let target = tmp.path().join("out/deep/form");

    let report = relocate_artifacts(&tmp.path().join("src/a.xfdl"), &target)
        .expect("relocation should succeed");

    assert!(report.moved.is_empty());
    assert!(target.is_dir());
}
