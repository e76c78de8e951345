// tests/config_test.rs
use std::io::Write;
use std::path::PathBuf;

use gorelease::config::{load_settings, Config, Settings};
use tempfile::NamedTempFile;

fn settings_file(contents: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(contents.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_from_file() {
    let temp_file = settings_file(
        r#"
output = "internal/version/version.go"
license_files = "LICENSE.md LICENSE COPYING"
"#,
    );

    let settings = load_settings(Some(temp_file.path())).unwrap();
    assert_eq!(
        settings.output.as_deref(),
        Some("internal/version/version.go")
    );

    let config = Config::from_settings(&settings);
    assert_eq!(config.output, PathBuf::from("internal/version/version.go"));
    assert_eq!(config.license_files, vec!["LICENSE.md", "LICENSE", "COPYING"]);
}

#[test]
fn test_partial_file_keeps_defaults() {
    let temp_file = settings_file("license_files = \"COPYING\"\n");
    let config = Config::from_settings(&load_settings(Some(temp_file.path())).unwrap());
    assert_eq!(config.output, PathBuf::from("gen/version/version.go"));
    assert_eq!(config.license_files, vec!["COPYING"]);
}

#[test]
fn test_empty_file_is_default() {
    let temp_file = settings_file("");
    let settings = load_settings(Some(temp_file.path())).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn test_malformed_file_is_error() {
    let temp_file = settings_file("output = [unterminated\n");
    let err = load_settings(Some(temp_file.path())).unwrap_err();
    assert!(format!("{:#}", err).contains("parsing settings"));
}

#[test]
fn test_unknown_key_is_error() {
    let temp_file = settings_file("remote = \"upstream\"\n");
    assert!(load_settings(Some(temp_file.path())).is_err());
}

#[test]
fn test_missing_explicit_file_is_error() {
    let err = load_settings(Some(std::path::Path::new("/nonexistent/gorelease.toml")))
        .unwrap_err();
    assert!(format!("{:#}", err).contains("reading settings"));
}
