use std::fs;
use std::path::Path;

use codescope::{canonicalize_or_current, infer_project_name, read_source};
use tempfile::tempdir;

#[test]
fn canonicalize_or_current_returns_cwd_for_dot() {
    let original = std::env::current_dir().expect("cwd");
    let tmp = tempdir().expect("tempdir");
    std::env::set_current_dir(tmp.path()).expect("chdir tmp");

    let result = canonicalize_or_current(".").expect("canonicalize").canonicalize().expect("canon");
    let expected = tmp.path().canonicalize().expect("canon tmp");
    assert_eq!(result, expected);

    std::env::set_current_dir(original).expect("restore cwd");
}

#[test]
fn canonicalize_or_current_keeps_missing_paths_absolute() {
    let result = canonicalize_or_current("does/not/exist/yet").expect("resolve");
    assert!(result.is_absolute());
    assert!(result.ends_with("does/not/exist/yet"));
}

#[test]
fn infer_project_name_uses_last_path_component() {
    assert_eq!(infer_project_name(Path::new("/tmp/project-root")), "project-root");
    assert_eq!(infer_project_name(Path::new("/")), "unnamed-project");
}

#[test]
fn read_source_reads_named_file() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("input.py");
    fs::write(&path, "print('hi')\n").expect("write");
    let text = read_source(Some(path.to_str().expect("utf8 path"))).expect("read");
    assert_eq!(text, "print('hi')\n");

    let err = read_source(Some("/definitely/missing.py")).unwrap_err();
    assert!(err.to_string().contains("Failed to read source file"));
}
