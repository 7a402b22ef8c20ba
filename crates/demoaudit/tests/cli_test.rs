use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/vim-demos.ts")
}

/// Run the binary with an isolated, nonexistent config file.
fn run(args: &[&str]) -> Output {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    Command::new(env!("CARGO_BIN_EXE_demoaudit"))
        .arg("-c")
        .arg(&config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_check_plain_output() {
    let source = fixture();
    let output = run(&["check", source.to_str().unwrap()]);

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Total demos analyzed: 3"));
    assert!(out.contains("Demo: comment-block"));
    assert!(out.contains("Demos skipped (no commands or modes):\n  - coming-soon"));
}

#[test]
fn test_check_strict_exit_code() {
    let source = fixture();
    let output = run(&["check", source.to_str().unwrap(), "--strict"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_analyze_table_output() {
    let source = fixture();
    let output = run(&[
        "analyze",
        source.to_str().unwrap(),
        "--id",
        "visual-selection",
        "--id",
        "refactor-function",
        "--policy",
        "allow-trailing-escape",
        "--strict",
    ]);

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.starts_with("Analyzing 2 demos..."));
    assert!(out.contains("Demos needing ESC: 0"));
}

#[test]
fn test_check_json_output() {
    let source = fixture();
    let output = run(&["check", source.to_str().unwrap(), "--format", "json"]);

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["summary"]["total"], 3);
    assert_eq!(value["summary"]["flagged"], 2);
}

#[test]
fn test_list_output() {
    let source = fixture();
    let output = run(&["list", source.to_str().unwrap()]);

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.starts_with("4 demos"));
    assert!(out.contains("Work in Progress"));
}

#[test]
fn test_missing_source_fails() {
    let output = run(&["check", "/nonexistent/vim-demos.ts"]);

    assert!(!output.status.success());
    let err = String::from_utf8_lossy(&output.stderr);
    assert!(err.contains("/nonexistent/vim-demos.ts"));
}

#[test]
fn test_config_validate_missing_file_fails() {
    let output = run(&["config", "validate", "--file", "/nonexistent/demoaudit.toml"]);

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("Configuration error: /nonexistent/demoaudit.toml not found"));
    assert!(!out.contains("Configuration is valid."));
}

#[test]
fn test_config_validate_rejects_empty_escape_command() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("demoaudit.toml");
    std::fs::write(&file, "[audit]\nescape_command = \"\"\n").unwrap();

    let output = run(&["config", "validate", "--file", file.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("Configuration error"));
    assert!(out.contains("escape_command"));
}

#[test]
fn test_config_validate_accepts_valid_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("demoaudit.toml");
    std::fs::write(&file, "[audit]\npolicy = \"allow-trailing-escape\"\n").unwrap();

    let output = run(&["config", "validate", "--file", file.to_str().unwrap()]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("Configuration is valid."));
}
