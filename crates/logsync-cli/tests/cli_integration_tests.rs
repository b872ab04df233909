//! CLI integration tests
//!
//! These tests drive the built binary against local directory sources and
//! check the report on stdout and the exit code.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn write_session(root: &Path, rel: &str, ids: &[&str]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let content: String = ids
        .iter()
        .map(|id| format!("{{\"uuid\":\"{}\",\"type\":\"user\"}}\n", id))
        .collect();
    fs::write(path, content).unwrap();
}

fn logsync(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_logsync"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI")
}

fn sources() -> (TempDir, String, String) {
    let temp_dir = TempDir::new().unwrap();
    let a = temp_dir.path().join("arm");
    let b = temp_dir.path().join("x86");
    fs::create_dir_all(&a).unwrap();
    fs::create_dir_all(&b).unwrap();
    let a = a.display().to_string();
    let b = b.display().to_string();
    (temp_dir, a, b)
}

#[test]
fn test_in_sync_exits_zero() {
    let (_tmp, a, b) = sources();
    write_session(Path::new(&a), "proj/s1.jsonl", &["u1", "u2", "u3"]);
    write_session(Path::new(&b), "proj/s1.jsonl", &["u1", "u2"]);
    write_session(Path::new(&a), "proj/s2.jsonl", &["v1"]);
    write_session(Path::new(&b), "proj/s2.jsonl", &["v1"]);

    let output = logsync(&["sessions", &a, &b]);

    assert_eq!(
        output.status.code(),
        Some(0),
        "Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("All 2 shared sessions are in sync"));
    assert!(stdout.contains("arm ahead:  1"));
}

#[test]
fn test_diverged_exits_one_with_details() {
    let (_tmp, a, b) = sources();
    write_session(Path::new(&a), "proj/s1.jsonl", &["u1", "u2", "u3"]);
    write_session(Path::new(&b), "proj/s1.jsonl", &["u1", "x", "u3"]);

    let output = logsync(&["sessions", &a, &b, "--label-a", "left"]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Session: proj/s1.jsonl"));
    assert!(stdout.contains("Divergence at entry 1 (0-indexed)"));
    assert!(stdout.contains("left id at divergence: u2"));
    assert!(stdout.contains("Last common id: u1"));
}

#[test]
fn test_json_format() {
    let (_tmp, a, b) = sources();
    write_session(Path::new(&a), "p.jsonl", &["u1"]);
    write_session(Path::new(&b), "q.jsonl", &["u1"]);

    let output = logsync(&["sessions", &a, &b, "--format", "json"]);

    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["result"]["counts"]["a_only"], 1);
    assert_eq!(value["result"]["counts"]["b_only"], 1);
    assert_eq!(value["a"]["label"], "arm");
}

#[test]
fn test_exclude_filter_hides_divergence() {
    let (_tmp, a, b) = sources();
    write_session(Path::new(&a), "keep/s.jsonl", &["u1"]);
    write_session(Path::new(&b), "keep/s.jsonl", &["u1"]);
    write_session(Path::new(&a), "skip/s.jsonl", &["u1"]);
    write_session(Path::new(&b), "skip/s.jsonl", &["zz"]);

    let output = logsync(&["sessions", &a, &b, "--exclude", "skip/*"]);

    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_missing_source_is_fetch_failure() {
    let (tmp, a, _b) = sources();
    let missing = tmp.path().join("missing").display().to_string();

    let output = logsync(&["sessions", &a, &missing]);

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERR_FETCH_FAILED"));
    assert!(stderr.contains("source B"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_bad_glob_is_config_error() {
    let (_tmp, a, b) = sources();

    let output = logsync(&["sessions", &a, &b, "--include", "["]);

    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn test_config_file_sets_report_limit() {
    let (tmp, a, b) = sources();
    for name in ["s1", "s2", "s3"] {
        write_session(Path::new(&a), &format!("{}.jsonl", name), &["u1"]);
        write_session(Path::new(&b), &format!("{}.jsonl", name), &["u2"]);
    }
    let config = tmp.path().join("logsync.toml");
    fs::write(&config, "[report]\ndetail_limit = 1\n").unwrap();

    let output = logsync(&["sessions", &a, &b, "--config", config.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("Session: ").count(), 1);
    assert!(stdout.contains("... and 2 more diverged sessions"));
}

#[test]
fn test_history_differences_exit_one() {
    let (_tmp, a, b) = sources();
    let shared = "{\"sessionId\":\"aaaaaaaa-1\",\"timestamp\":1,\"display\":\"hi\"}\n";
    fs::write(Path::new(&a).join("history.jsonl"), shared).unwrap();
    fs::write(
        Path::new(&b).join("history.jsonl"),
        format!(
            "{}{}",
            shared, "{\"sessionId\":\"bbbbbbbb-2\",\"timestamp\":2,\"display\":\"extra\"}\n"
        ),
    )
    .unwrap();

    let output = logsync(&["history", &a, &b]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 entry differs between sources"));
    assert!(stdout.contains("bbbbbbbb | 2 | extra"));
}

#[test]
fn test_history_identical_exits_zero() {
    let (_tmp, a, b) = sources();
    let text = "{\"sessionId\":\"s\",\"timestamp\":1,\"display\":\"hi\"}\n";
    fs::write(Path::new(&a).join("history.jsonl"), text).unwrap();
    fs::write(Path::new(&b).join("history.jsonl"), text).unwrap();

    let output = logsync(&["history", &a, &b]);

    assert_eq!(output.status.code(), Some(0));
}
