//! End-to-end tests for the `macrolex` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn macrolex() -> Command {
    let mut cmd = Command::cargo_bin("macrolex").expect("binary to be built");
    cmd.env_remove("MACROLEX_LOG");
    cmd
}

#[test]
fn test_help() {
    macrolex()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("tokenize"));
}

#[test]
fn test_tokenize_stdin_tag_format() {
    macrolex()
        .args(["tokenize", "-"])
        .write_stdin("hi {{name}}")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"Plaintext "hi " @0..3 0:0"#))
        .stdout(predicate::str::contains(r#"Macro.Identifier "name" @5..9 0:5"#));
}

#[test]
fn test_tokenize_file_json_format() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("input.txt");
    fs::write(&path, "{{a|upper}}").expect("write input");

    let output = macrolex()
        .arg("tokenize")
        .arg(&path)
        .args(["--format", "json"])
        .output()
        .expect("run binary");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(value["tokens"].as_array().map(Vec::len), Some(5));
    assert_eq!(value["final_depth"], 1);
}

#[test]
fn test_lexical_errors_exit_with_two() {
    macrolex()
        .args(["tokenize", "-"])
        .write_stdin("{{name")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("unterminated construct"));
}

#[test]
fn test_recovery_flag_overrides_config() {
    macrolex()
        .args(["tokenize", "-", "--recovery", "abort"])
        .write_stdin("{{a!b}} tail")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Plaintext").not());
}

#[test]
fn test_config_file_disables_positions() {
    let dir = TempDir::new().expect("temp dir");
    let config = dir.path().join("macrolex.toml");
    fs::write(&config, "[lexer]\ntrack-positions = false\n").expect("write config");

    macrolex()
        .args(["tokenize", "-", "--config"])
        .arg(&config)
        .write_stdin("{{a}}")
        .assert()
        .success()
        .stdout(predicate::str::contains("Macro.Start \"{{\" @0..2\n"));
}

#[test]
fn test_local_config_file_is_picked_up() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join("macrolex.toml"), "[output]\nformat = \"yaml\"\n")
        .expect("write config");

    macrolex()
        .current_dir(dir.path())
        .args(["tokenize", "-"])
        .write_stdin("{{a}}")
        .assert()
        .success()
        .stdout(predicate::str::contains("final_depth: 1"));

    // Flags still win over the local file
    macrolex()
        .current_dir(dir.path())
        .args(["tokenize", "-", "--format", "tag"])
        .write_stdin("{{a}}")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Macro.Start"));
}

#[test]
fn test_unknown_format_fails() {
    macrolex()
        .args(["tokenize", "-", "--format", "xml"])
        .write_stdin("x")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown format 'xml'"));
}

#[test]
fn test_missing_input_file_fails() {
    macrolex()
        .args(["tokenize", "/nonexistent/input.txt"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error reading"));
}

#[test]
fn test_modes_lists_builtin_table() {
    macrolex()
        .arg("modes")
        .assert()
        .success()
        .stdout(predicate::str::contains("text (default)"))
        .stdout(predicate::str::contains("Args.Exit <always> skip pop"));
}

#[test]
fn test_formats_lists_builtins() {
    macrolex()
        .arg("formats")
        .assert()
        .success()
        .stdout(predicate::str::contains("json"))
        .stdout(predicate::str::contains("tag"))
        .stdout(predicate::str::contains("yaml"));
}
