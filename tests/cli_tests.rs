//! CLI interface tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn feedstock(content: &str) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("recipe")).unwrap();
    fs::write(temp_dir.path().join("conda-forge.yml"), content).unwrap();
    temp_dir
}

#[test]
fn test_version_flag() {
    let mut cmd = Command::cargo_bin("forgeyml").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("forgeyml"));
}

#[test]
fn test_help_flag() {
    let mut cmd = Command::cargo_bin("forgeyml").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Validate and normalize conda-forge.yml",
        ));
}

#[test]
fn test_missing_config_error() {
    let mut cmd = Command::cargo_bin("forgeyml").unwrap();
    cmd.arg("--config")
        .arg("nonexistent.yml")
        .assert()
        .failure()
        .code(1) // Configuration error
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn test_valid_config() {
    let temp_dir = feedstock("provider:\n  linux_aarch64: default\n");
    let config_path = temp_dir.path().join("conda-forge.yml");

    let mut cmd = Command::cargo_bin("forgeyml").unwrap();
    cmd.arg("--config")
        .arg(config_path.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"));
}

#[test]
fn test_invalid_yaml_config() {
    let temp_dir = feedstock("provider:\n  linux_64: [azure\n");
    let config_path = temp_dir.path().join("conda-forge.yml");

    let mut cmd = Command::cargo_bin("forgeyml").unwrap();
    cmd.arg("--config")
        .arg(config_path.to_str().unwrap())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse"));
}

#[test]
fn test_validation_failure_exit_code() {
    let temp_dir = feedstock("conda_solver: pip\nmatrix:\n  python: ['3.11']\n");
    let config_path = temp_dir.path().join("conda-forge.yml");

    let mut cmd = Command::cargo_bin("forgeyml").unwrap();
    cmd.arg("--config")
        .arg(config_path.to_str().unwrap())
        .assert()
        .failure()
        .code(2) // Validation error
        .stderr(predicate::str::contains("conda_solver"))
        .stderr(predicate::str::contains("matrix"));
}

#[test]
fn test_provider_enabled_warns_but_succeeds() {
    let temp_dir = feedstock("travis:\n  enabled: true\n");
    let config_path = temp_dir.path().join("conda-forge.yml");

    let mut cmd = Command::cargo_bin("forgeyml").unwrap();
    cmd.arg("--config")
        .arg(config_path.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 warning(s)"))
        .stderr(predicate::str::contains("It is not allowed to set the `enabled` parameter"));
}

#[test]
fn test_normalized_yaml_output() {
    let temp_dir = feedstock("win:\n  enabled: true\n");
    let config_path = temp_dir.path().join("conda-forge.yml");

    let mut cmd = Command::cargo_bin("forgeyml").unwrap();
    cmd.arg("--config")
        .arg(config_path.to_str().unwrap())
        .arg("--normalized")
        .assert()
        .success()
        .stdout(predicate::str::contains("win_64:\n  enabled: true"))
        .stdout(predicate::str::contains("recipe_dir: recipe"))
        .stdout(predicate::str::contains("\nwin:").not());
}

#[test]
fn test_normalized_json_output() {
    let temp_dir = feedstock("{}\n");
    let config_path = temp_dir.path().join("conda-forge.yml");

    let mut cmd = Command::cargo_bin("forgeyml").unwrap();
    let output = cmd
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .arg("--normalized")
        .arg("--output-format")
        .arg("json")
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["channel_priority"], "strict");
    assert_eq!(value["noarch_platforms"], serde_json::json!(["linux_64"]));
}

#[test]
fn test_invalid_output_format() {
    let temp_dir = feedstock("{}\n");
    let config_path = temp_dir.path().join("conda-forge.yml");

    let mut cmd = Command::cargo_bin("forgeyml").unwrap();
    cmd.arg("--config")
        .arg(config_path.to_str().unwrap())
        .arg("--normalized")
        .arg("--output-format")
        .arg("toml")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid format: toml"));
}

#[test]
fn test_lint_with_recipe_dir() {
    let temp_dir = feedstock("bot:\n  automerge: always\ncircle:\n  enabled: true\n");
    let recipe_dir = temp_dir.path().join("recipe");

    let mut cmd = Command::cargo_bin("forgeyml").unwrap();
    cmd.arg("--recipe-dir")
        .arg(recipe_dir.to_str().unwrap())
        .arg("--lint")
        .assert()
        .failure()
        .code(2)
        .stdout(predicate::str::contains("* In conda-forge.yml: [`bot.automerge`]"))
        .stdout(predicate::str::contains(
            "https://conda-forge.org/docs/maintainer/conda_forge_yml/#bot",
        ));
}

#[test]
fn test_lint_hints_only_succeeds() {
    let temp_dir = feedstock("circle:\n  enabled: true\n");
    let recipe_dir = temp_dir.path().join("recipe");

    let mut cmd = Command::cargo_bin("forgeyml").unwrap();
    cmd.arg("--recipe-dir")
        .arg(recipe_dir.to_str().unwrap())
        .arg("--lint")
        .assert()
        .success()
        .stdout(predicate::str::contains("[`circle.enabled`]"));
}

#[test]
fn test_recipe_dir_without_config_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let recipe_dir = temp_dir.path().join("recipe");
    fs::create_dir(&recipe_dir).unwrap();

    let mut cmd = Command::cargo_bin("forgeyml").unwrap();
    cmd.arg("--recipe-dir")
        .arg(recipe_dir.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"));
}

#[test]
fn test_docs_output() {
    let mut cmd = Command::cargo_bin("forgeyml").unwrap();
    cmd.arg("--docs")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# conda-forge.yml Reference"))
        .stdout(predicate::str::contains("## `provider`"));
}

#[test]
fn test_schema_output() {
    let mut cmd = Command::cargo_bin("forgeyml").unwrap();
    let output = cmd.arg("--schema").output().unwrap();

    assert!(output.status.success());
    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(schema["$schema"], "http://json-schema.org/draft-07/schema#");
    assert!(schema["properties"]["build_platform"].is_object());
}

#[test]
fn test_modes_are_exclusive() {
    let mut cmd = Command::cargo_bin("forgeyml").unwrap();
    cmd.arg("--docs").arg("--schema").assert().failure().code(2);
}
