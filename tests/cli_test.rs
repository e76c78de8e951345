// tests/cli_test.rs
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use git2::{Repository, Signature};
use tempfile::TempDir;

fn gorelease(dir: &Path, args: &[&str]) -> Output {
    gorelease_with_home(dir, dir, args)
}

/// Run with `HOME` pointed at `home`, so no real SSH key or settings file is seen
fn gorelease_with_home(dir: &Path, home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gorelease"))
        .args(args)
        .current_dir(dir)
        .env("HOME", home)
        .env_remove("XDG_CONFIG_HOME")
        .env("CLICOLOR", "0")
        .env_remove("CLICOLOR_FORCE")
        .output()
        .expect("Failed to execute gorelease")
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

/// Committed repository with an untracked `.version`
fn release_ready(version: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    let repo = Repository::init(dir.path()).unwrap();
    fs::write(dir.path().join("LICENSE.md"), "Copyright (c) 2024 CLI Test").unwrap();
    let mut index = repo.index().unwrap();
    index.add_path(Path::new("LICENSE.md")).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let sig = Signature::now("Fixture", "fixture@example.com").unwrap();
    repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
        .unwrap();
    fs::write(dir.path().join(".version"), version).unwrap();
    dir
}

#[test]
fn test_help() {
    let dir = TempDir::new().unwrap();
    let output = gorelease(dir.path(), &["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("gorelease"));
    assert!(stdout.contains("--dry-run"));
}

#[test]
fn test_version_flag_exits_before_repository_lookup() {
    let dir = TempDir::new().unwrap();
    for flag in ["-version", "--version"] {
        let output = gorelease(dir.path(), &[flag]);
        assert_eq!(output.status.code(), Some(0));
        let stdout = String::from_utf8(output.stdout).unwrap();
        assert_eq!(
            stdout.trim(),
            format!("gorelease {}", env!("CARGO_PKG_VERSION"))
        );
    }
}

#[test]
fn test_dry_run_prints_source() {
    let dir = release_ready("1.2.3\n");
    let output = gorelease(dir.path(), &["-dry-run"]);
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("/*\n *Copyright (c) 2024 CLI Test\n */\n"));
    assert!(stdout.contains("package version"));
    assert!(stdout.contains("const Version = \"v1.2.3\""));
    assert!(!dir.path().join("gen").exists());
}

#[test]
fn test_dry_run_custom_output() {
    let dir = release_ready("0.2.0\n");
    let output = gorelease(dir.path(), &["-dry-run", "-output=version.go"]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("package main"));
}

#[test]
fn test_invalid_version_exit_code() {
    let dir = release_ready("not-a-version\n");
    let output = gorelease(dir.path(), &["-dry-run"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("not-a-version"));
}

#[test]
fn test_version_conflict_exit_code() {
    let dir = release_ready("2.0.0\n");
    fs::write(dir.path().join("go.mod"), "module example.com/foo\n").unwrap();
    let output = gorelease(dir.path(), &["-dry-run", "-dirty"]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_dirty_repository_exit_code() {
    let dir = release_ready("1.0.0\n");
    fs::write(dir.path().join("notes.txt"), "wip").unwrap();

    let output = gorelease(dir.path(), &["-dry-run"]);
    assert_eq!(output.status.code(), Some(1));

    let output = gorelease(dir.path(), &["-dry-run", "-dirty"]);
    assert_eq!(output.status.code(), Some(0));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("WARNING"));
}

#[test]
fn test_unknown_flag_is_rejected() {
    let dir = TempDir::new().unwrap();
    let output = gorelease(dir.path(), &["--force"]);
    assert!(!output.status.success());
}

#[test]
fn test_verbose_shows_push_errors() {
    // no remote configured, so every push fails
    let quiet = release_ready("0.4.0\n");
    let home = TempDir::new().unwrap();
    let output = gorelease_with_home(quiet.path(), home.path(), &[]);
    assert_eq!(output.status.code(), Some(0));
    let stderr = stderr_of(&output);
    assert!(stderr.contains("WARNING"));
    assert!(!stderr.contains("Cannot find remote"));

    let verbose = release_ready("0.4.0\n");
    let output = gorelease_with_home(verbose.path(), home.path(), &["-verbose"]);
    assert_eq!(output.status.code(), Some(0));
    let stderr = stderr_of(&output);
    assert!(stderr.contains("Cannot find remote"));
    assert!(stderr.contains("push without key failed"));
}

#[test]
fn test_push_failure_prints_each_recovery_command_once() {
    let dir = release_ready("0.4.0\n");
    let home = TempDir::new().unwrap();
    let output = gorelease_with_home(dir.path(), home.path(), &[]);
    assert_eq!(output.status.code(), Some(0));

    let stderr = stderr_of(&output);
    assert_eq!(stderr.matches("git push origin v0.4.0; git push").count(), 1);
    let branch_hints = stderr
        .lines()
        .filter(|line| line.trim() == "git push origin")
        .count();
    assert_eq!(branch_hints, 1);
}

#[test]
fn test_malformed_settings_file_is_fatal() {
    let dir = release_ready("1.0.0\n");
    let settings = TempDir::new().unwrap();
    let path = settings.path().join("gorelease.toml");
    fs::write(&path, "output = [unterminated\n").unwrap();

    let output = gorelease(dir.path(), &["-dry-run", "-config", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr_of(&output);
    assert!(stderr.contains("Error loading config"));
    assert!(stderr.contains("parsing settings"));
}
