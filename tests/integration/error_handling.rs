// tests/integration/error_handling.rs

use std::io::Write;

use tempfile::NamedTempFile;
use treewatch::config::{RawConfigFile, load_and_validate, load_from_path, validate_raw_config};
use treewatch::errors::WatchError;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn zero_backend_buffer_is_a_config_error() {
    let file = config_file(
        r#"
[watch]
backend_buffer = 0
"#,
    );

    let err = load_and_validate(file.path()).unwrap_err();
    match err {
        WatchError::ConfigError(msg) => assert!(msg.contains("backend_buffer"), "{msg}"),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn zero_output_buffer_is_a_config_error() {
    let file = config_file(
        r#"
[watch]
output_buffer = 0
"#,
    );

    let err = load_and_validate(file.path()).unwrap_err();
    assert!(matches!(err, WatchError::ConfigError(ref msg) if msg.contains("output_buffer")));
}

#[test]
fn bad_glob_is_a_config_error() {
    let file = config_file(
        r#"
[ignore]
patterns = ["ok/**", "broken/[x"]
"#,
    );

    let err = load_and_validate(file.path()).unwrap_err();
    match err {
        WatchError::ConfigError(msg) => {
            assert!(msg.starts_with("[ignore].patterns"), "{msg}");
            assert!(msg.contains("broken/[x"), "{msg}");
        }
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn empty_pattern_is_a_config_error() {
    let file = config_file(
        r#"
[ignore]
patterns = ["  "]
"#,
    );

    let err = load_and_validate(file.path()).unwrap_err();
    assert!(matches!(err, WatchError::ConfigError(_)));
}

#[test]
fn unknown_rename_capability_is_a_toml_error() {
    let file = config_file(
        r#"
[watch]
rename = "sideways"
"#,
    );

    let err = load_from_path(file.path()).unwrap_err();
    match err {
        WatchError::TomlError(e) => assert!(e.to_string().contains("sideways")),
        other => panic!("expected TomlError, got {other:?}"),
    }
}

#[test]
fn malformed_toml_is_a_toml_error() {
    let file = config_file("[watch\nbackend_buffer = ");
    assert!(matches!(
        load_from_path(file.path()).unwrap_err(),
        WatchError::TomlError(_)
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_and_validate(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, WatchError::IoError(_)));
}

#[test]
fn default_raw_config_is_valid() {
    validate_raw_config(&RawConfigFile::default()).unwrap();
}
