use std::fs;

use pdb_harvest::{canonicalize_or_current, validate_module_name};
use tempfile::tempdir;

#[test]
fn canonicalize_or_current_returns_cwd_for_dot() {
    let cwd = std::env::current_dir().expect("cwd");
    let result = canonicalize_or_current(".").expect("canonicalize");
    assert_eq!(result, cwd);
}

#[test]
fn canonicalize_or_current_resolves_existing_path() {
    let tmp = tempdir().expect("tempdir");
    let subdir = tmp.path().join("nested");
    fs::create_dir_all(&subdir).expect("create nested");

    let result = canonicalize_or_current(subdir.to_str().unwrap()).expect("canonicalize nested");
    assert_eq!(result, subdir.canonicalize().expect("canonicalize subdir"));
}

#[test]
fn canonicalize_or_current_joins_missing_relative_path_onto_cwd() {
    let cwd = std::env::current_dir().expect("cwd");
    let result = canonicalize_or_current("not-created-yet-root").expect("resolve");
    assert_eq!(result, cwd.join("not-created-yet-root"));
}

#[test]
fn module_names_must_be_bare_file_names() {
    assert!(validate_module_name("ntoskrnl.exe").is_ok());
    assert!(validate_module_name("").is_err());
    assert!(validate_module_name("..").is_err());
    let err = validate_module_name("..\\evil.dll").unwrap_err();
    assert!(err.to_string().contains("bare file name"));
    assert!(validate_module_name("sub/dir.dll").is_err());
}

#[test]
fn module_names_with_surrounding_whitespace_are_rejected() {
    let err = validate_module_name(" ntdll.dll ").unwrap_err();
    assert!(err.to_string().contains("whitespace"), "{err}");
    assert!(validate_module_name("ntdll.dll\n").is_err());
    assert!(validate_module_name("   ").is_err());
}
