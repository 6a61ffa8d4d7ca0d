use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Three sources, ten clips each, durations given so nothing is probed
fn write_project(dir: &Path, clips_per_source: usize) -> std::path::PathBuf {
    let starts: Vec<String> = (0..clips_per_source).map(|n| format!("{}.0", n * 2)).collect();
    let clips = starts.join(", ");

    let mut content = String::new();
    for name in ["first", "second", "third"] {
        content.push_str(&format!(
            "[[sources]]\npath = \"{}.mp4\"\nduration = 120.0\nclips = [{}]\n\n",
            name, clips
        ));
    }

    let path = dir.join("session.toml");
    std::fs::write(&path, content).unwrap();
    path
}

fn shortsmix(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("shortsmix").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env_remove("SHORTSMIX_CONFIG")
        .arg("--log-level")
        .arg("warn");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    shortsmix(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("preview"))
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("probe"));
}

#[test]
fn test_preview_prints_alternating_sequence() {
    let dir = TempDir::new().unwrap();
    let project = write_project(dir.path(), 10);

    shortsmix(&dir)
        .args(["preview", "--target", "15", "--project"])
        .arg(&project)
        .assert()
        .success()
        .stdout(predicate::str::contains("Clip pool: 30 clips, 45.0s total"))
        .stdout(predicate::str::contains("A1"))
        .stdout(predicate::str::contains("0:00.0 - 0:01.5"))
        .stdout(predicate::str::contains("No source repeats back to back"));
}

#[test]
fn test_preview_json() {
    let dir = TempDir::new().unwrap();
    let project = write_project(dir.path(), 4);

    let output = shortsmix(&dir)
        .args(["preview", "--json", "--target", "15", "--project"])
        .arg(&project)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["clips_needed"], 10);
    assert_eq!(json["selected"].as_array().unwrap().len(), 10);
    assert_eq!(json["sequence"][0]["id"], "a1");
    assert_eq!(json["is_valid"], true);
}

#[test]
fn test_generate_dry_run_report() {
    let dir = TempDir::new().unwrap();
    let project = write_project(dir.path(), 10);

    let output = shortsmix(&dir)
        .args(["generate", "--dry-run", "--report", "json", "--target", "15", "--count", "2"])
        .args(["--format", "webm", "--out-dir", "renders", "--project"])
        .arg(&project)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let outputs = json["outputs"].as_array().unwrap();
    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[1]["id"], "gen_2");
    assert_eq!(outputs[0]["outcome"]["status"], "success");

    let filename = outputs[0]["filename"].as_str().unwrap();
    assert!(filename.starts_with("shorts_01_15s_"));
    assert!(filename.ends_with(".webm"));
    assert!(!dir.path().join("renders").exists());
}

#[test]
fn test_generate_dry_run_yaml() {
    let dir = TempDir::new().unwrap();
    let project = write_project(dir.path(), 10);

    shortsmix(&dir)
        .args(["generate", "--dry-run", "--report", "yaml", "--count", "1", "--project"])
        .arg(&project)
        .assert()
        .success()
        .stdout(predicate::str::contains("requested: 1"))
        .stdout(predicate::str::contains("status: success"));
}

#[test]
fn test_generate_rejects_small_pool() {
    let dir = TempDir::new().unwrap();
    let project = write_project(dir.path(), 2);

    shortsmix(&dir)
        .args(["generate", "--dry-run", "--target", "30", "--project"])
        .arg(&project)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Insufficient clips: 20 required, 6 available"));
}

#[test]
fn test_generate_rejects_unknown_target() {
    let dir = TempDir::new().unwrap();
    let project = write_project(dir.path(), 10);

    shortsmix(&dir)
        .args(["generate", "--dry-run", "--target", "20", "--project"])
        .arg(&project)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid target duration"));
}

#[test]
fn test_generate_fails_fast_without_ffmpeg() {
    let dir = TempDir::new().unwrap();
    let project = write_project(dir.path(), 10);

    shortsmix(&dir)
        .env("SHORTSMIX_FFMPEG", "/nonexistent/ffmpeg")
        .args(["generate", "--target", "15", "--count", "2", "--project"])
        .arg(&project)
        .assert()
        .failure()
        .stdout(predicate::str::contains("FAILED").not())
        .stderr(predicate::str::contains("Failed to run /nonexistent/ffmpeg"));
}

#[test]
fn test_config_file_defaults_apply() {
    let dir = TempDir::new().unwrap();
    let project = write_project(dir.path(), 10);
    std::fs::write(
        dir.path().join("shortsmix.toml"),
        "[generation]\ntarget_duration = 15\ncount = 1\nformat = \"webm\"\n",
    )
    .unwrap();

    let output = shortsmix(&dir)
        .args(["generate", "--dry-run", "--report", "json", "--project"])
        .arg(&project)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["requested"], 1);
    let filename = json["outputs"][0]["filename"].as_str().unwrap();
    assert!(filename.starts_with("shorts_01_15s_"));
    assert!(filename.ends_with(".webm"));
}

#[test]
fn test_probe_missing_file_fails() {
    let dir = TempDir::new().unwrap();

    shortsmix(&dir)
        .args(["probe", "--input", "missing.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}
