#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn hearth() -> Command {
    Command::cargo_bin("hearth").unwrap()
}

/// Write a config file into a fresh temp directory.
fn config_file(contents: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hearth.toml");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

// ---------------------------------------------------------------------------
// defaults
// ---------------------------------------------------------------------------

#[test]
fn defaults_prints_toml() {
    hearth()
        .arg("defaults")
        .assert()
        .success()
        .stdout(predicate::str::contains("seed = 42"))
        .stdout(predicate::str::contains("[scheduler]"))
        .stdout(predicate::str::contains("tick_rate = 0.1"))
        .stdout(predicate::str::contains("founders"));
}

#[test]
fn defaults_output_loads_back() {
    let output = hearth().arg("defaults").output().unwrap();
    assert!(output.status.success());
    let (_dir, path) = config_file(&String::from_utf8(output.stdout).unwrap());

    hearth()
        .args(["run", "--ticks", "5", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Ran 5 ticks with seed 42"));
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

#[test]
fn run_prints_summary() {
    hearth()
        .args(["run", "--ticks", "20", "--seed", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ran 20 ticks with seed 7"))
        .stdout(predicate::str::contains("Hearthfield"))
        .stdout(predicate::str::contains("Population"))
        .stdout(predicate::str::contains("Continent generated."));
}

#[test]
fn run_json_exports_snapshot() {
    let output = hearth()
        .args(["run", "--ticks", "10", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let snapshot: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(snapshot["tick"], 10);
    assert!(snapshot["humans"].is_array());
    assert!(snapshot["population"].as_u64().unwrap() >= 1);
    assert!(snapshot["events"].is_array());
}

#[test]
fn run_zero_ticks_keeps_founders() {
    hearth()
        .args(["run", "--ticks", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(Adán y Eva)"))
        .stdout(predicate::str::contains("0 starved, 0 animals born"))
        .stdout(predicate::str::contains("Eva"));
}

#[test]
fn run_with_partial_config() {
    let (_dir, path) = config_file(
        r#"
seed = 3

[generation]
animals = 0
"#,
    );
    let output = hearth()
        .args(["run", "--ticks", "1", "--json", "--config"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let snapshot: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(snapshot["animals"].as_array().unwrap().len(), 0);
    assert_eq!(snapshot["resources"].as_array().unwrap().len(), 60);
}

#[test]
fn run_rejects_invalid_config() {
    let (_dir, path) = config_file("[scheduler]\ntick_rate = -1.0\n");
    hearth()
        .args(["run", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("tick_rate"));
}

#[test]
fn run_rejects_nan_probability() {
    let (_dir, path) = config_file("[ecology]\nfood_spawn_chance = nan\n");
    hearth()
        .args(["run", "--ticks", "5", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("food_spawn_chance"))
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn run_rejects_unparsable_config() {
    let (_dir, path) = config_file("seed = \"not a number\"\n");
    hearth()
        .args(["run", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config"));
}

#[test]
fn run_missing_config_fails() {
    hearth()
        .args(["run", "--config", "/nonexistent/hearth.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn run_rejects_zero_speed() {
    hearth()
        .args(["run", "--speed", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

// ---------------------------------------------------------------------------
// play
// ---------------------------------------------------------------------------

#[test]
fn play_runs_ticks_from_frames() {
    hearth()
        .args(["play", "--seconds", "1", "--fps", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10 frames at 10 fps"));
}

#[test]
fn play_reports_dropped_time() {
    hearth()
        .args(["play", "--seconds", "3", "--fps", "1", "--speed", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 frames at 1 fps"))
        .stdout(predicate::str::contains("30 ticks"))
        .stdout(predicate::str::contains("dropped"));
}

#[test]
fn play_rejects_zero_fps() {
    hearth()
        .args(["play", "--fps", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("fps must be at least 1"));
}

// ---------------------------------------------------------------------------
// general
// ---------------------------------------------------------------------------

#[test]
fn help_lists_subcommands() {
    hearth()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("play"))
        .stdout(predicate::str::contains("defaults"));
}

#[test]
fn verbose_flag_is_accepted() {
    hearth()
        .args(["--verbose", "run", "--ticks", "2"])
        .assert()
        .success();
}
