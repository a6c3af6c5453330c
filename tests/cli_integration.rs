//! CLI integration tests for Horizon
//!
//! These tests drive the binary end to end: project setup, snapshot loading
//! in each supported format, and the text and JSON output of every command.

use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a command instance for the horizon binary
fn horizon_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("horizon"));
    cmd.env_remove("HORIZON_GRAPH").env_remove("HORIZON_LOG");
    cmd
}

/// Create a temporary directory and initialize a horizon project
fn setup_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    horizon_cmd().arg("init").arg(dir.path()).assert().success();
    dir
}

/// Writes the documented scenario into the project's task store:
/// A(done) and B(todo, 2d) both feed C(todo, 3d)
fn write_scenario(dir: &Path) {
    fs::write(
        dir.join(".horizon/tasks.jsonl"),
        r#"{"id": "A", "title": "Set up repo", "status": "done"}
{"id": "B", "title": "Write parser", "estimate": "2d"}
{"id": "C", "title": "Ship release", "estimate": "3d", "depends_on": ["A", "B"]}
"#,
    )
    .unwrap();
}

fn json_stdout(assert: assert_cmd::assert::Assert) -> Value {
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    serde_json::from_str(&stdout).unwrap()
}

// =============================================================================
// Initialization Tests
// =============================================================================

#[test]
fn test_init_creates_structure() {
    let dir = TempDir::new().unwrap();

    horizon_cmd()
        .arg("init")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized horizon project"));

    assert!(dir.path().join(".horizon").is_dir());
    assert!(dir.path().join(".horizon/config.toml").is_file());
    assert!(dir.path().join(".horizon/tasks.jsonl").is_file());
}

#[test]
fn test_init_is_idempotent() {
    let dir = TempDir::new().unwrap();

    horizon_cmd().arg("init").arg(dir.path()).assert().success();
    write_scenario(dir.path());
    horizon_cmd().arg("init").arg(dir.path()).assert().success();

    let content = fs::read_to_string(dir.path().join(".horizon/tasks.jsonl")).unwrap();
    assert!(content.contains("Ship release"));
}

#[test]
fn test_commands_outside_project_fail() {
    let dir = TempDir::new().unwrap();

    horizon_cmd()
        .current_dir(dir.path())
        .args(["frontier", "C"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not in a horizon project"));
}

// =============================================================================
// Frontier Tests
// =============================================================================

#[test]
fn test_frontier_text() {
    let dir = setup_project();
    write_scenario(dir.path());

    horizon_cmd()
        .current_dir(dir.path())
        .args(["frontier", "C"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Frontier for C (1)"))
        .stdout(predicate::str::contains("Write parser"))
        .stdout(predicate::str::contains("Set up repo").not());
}

#[test]
fn test_frontier_json() {
    let dir = setup_project();
    write_scenario(dir.path());

    let json = json_stdout(
        horizon_cmd()
            .current_dir(dir.path())
            .args(["frontier", "C", "--format", "json"])
            .assert()
            .success(),
    );

    assert_eq!(json["focal"], "C");
    let frontier = json["frontier"].as_array().unwrap();
    assert_eq!(frontier.len(), 1);
    assert_eq!(frontier[0]["id"], "B");
    assert_eq!(frontier[0]["status"], "todo");
}

#[test]
fn test_frontier_without_focus_is_empty() {
    let dir = setup_project();
    write_scenario(dir.path());

    horizon_cmd()
        .current_dir(dir.path())
        .arg("frontier")
        .assert()
        .success()
        .stdout(predicate::str::contains("No focal task selected"));

    let json = json_stdout(
        horizon_cmd()
            .current_dir(dir.path())
            .args(["frontier", "--format", "json"])
            .assert()
            .success(),
    );
    assert!(json["focal"].is_null());
    assert_eq!(json["frontier"].as_array().unwrap().len(), 0);
}

#[test]
fn test_unknown_focal_is_not_an_error() {
    let dir = setup_project();
    write_scenario(dir.path());

    horizon_cmd()
        .current_dir(dir.path())
        .args(["frontier", "nope"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing actionable"))
        .stderr(predicate::str::contains("not found in graph"));
}

#[test]
fn test_invalid_task_id_rejected() {
    let dir = setup_project();

    horizon_cmd()
        .current_dir(dir.path())
        .args(["frontier", "two words"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid task ID"));
}

// =============================================================================
// Time Tests
// =============================================================================

#[test]
fn test_times_text() {
    let dir = setup_project();
    write_scenario(dir.path());

    horizon_cmd()
        .current_dir(dir.path())
        .args(["times", "C"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Remaining time for C"))
        .stdout(predicate::str::contains("1 week"))
        .stdout(predicate::str::contains("2 days"));
}

#[test]
fn test_times_json_focal_first() {
    let dir = setup_project();
    write_scenario(dir.path());

    let json = json_stdout(
        horizon_cmd()
            .current_dir(dir.path())
            .args(["times", "C", "--format", "json"])
            .assert()
            .success(),
    );

    let times = json["times"].as_array().unwrap();
    assert_eq!(times.len(), 2);
    assert_eq!(times[0]["id"], "C");
    assert_eq!(times[0]["metric"]["kind"], "known");
    assert_eq!(times[0]["metric"]["serial_sum"], 5.0);
    assert_eq!(times[0]["metric"]["critical_min"], 5.0);
    assert_eq!(times[1]["id"], "B");
}

#[test]
fn test_times_needs_estimate() {
    let dir = setup_project();
    fs::write(
        dir.path().join(".horizon/tasks.jsonl"),
        r#"{"id": "spike"}
{"id": "goal", "estimate": "1w", "depends_on": ["spike"]}
"#,
    )
    .unwrap();

    let json = json_stdout(
        horizon_cmd()
            .current_dir(dir.path())
            .args(["times", "goal", "--format", "json"])
            .assert()
            .success(),
    );
    assert_eq!(json["times"][0]["id"], "goal");
    assert_eq!(json["times"][0]["metric"]["kind"], "unknown");

    horizon_cmd()
        .current_dir(dir.path())
        .args(["times", "goal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("needs estimate"));
}

#[test]
fn test_times_resolved_focal() {
    let dir = setup_project();
    write_scenario(dir.path());

    horizon_cmd()
        .current_dir(dir.path())
        .args(["times", "A"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No remaining time for A"));
}

// =============================================================================
// Ancestors / Focus Tests
// =============================================================================

#[test]
fn test_ancestors_policies() {
    let dir = setup_project();
    fs::write(
        dir.path().join(".horizon/tasks.jsonl"),
        r#"{"id": "old"}
{"id": "done", "status": "done", "depends_on": ["old"]}
{"id": "goal", "depends_on": ["done"]}
"#,
    )
    .unwrap();

    let all = json_stdout(
        horizon_cmd()
            .current_dir(dir.path())
            .args(["ancestors", "goal", "-f", "json"])
            .assert()
            .success(),
    );
    assert_eq!(all["ancestors"].as_array().unwrap().len(), 2);

    let stopped = json_stdout(
        horizon_cmd()
            .current_dir(dir.path())
            .args(["ancestors", "goal", "--stop-at-resolved", "-f", "json"])
            .assert()
            .success(),
    );
    let ancestors = stopped["ancestors"].as_array().unwrap();
    assert_eq!(ancestors.len(), 1);
    assert_eq!(ancestors[0]["id"], "done");
}

#[test]
fn test_focus_combines_views() {
    let dir = setup_project();
    write_scenario(dir.path());

    horizon_cmd()
        .current_dir(dir.path())
        .args(["focus", "C"])
        .assert()
        .success()
        .stdout(predicate::str::contains("C: 1 week serial, 1 week critical path"))
        .stdout(predicate::str::contains("Frontier for C"));
}

#[test]
fn test_focus_pin_sets_default() {
    let dir = setup_project();
    write_scenario(dir.path());

    horizon_cmd()
        .current_dir(dir.path())
        .args(["focus", "C", "--pin"])
        .assert()
        .success();

    let config = fs::read_to_string(dir.path().join(".horizon/config.toml")).unwrap();
    assert!(config.contains("focus = \"C\""));

    // No task argument now falls back to the pinned focus
    let json = json_stdout(
        horizon_cmd()
            .current_dir(dir.path())
            .args(["frontier", "--format", "json"])
            .assert()
            .success(),
    );
    assert_eq!(json["focal"], "C");
    assert_eq!(json["frontier"][0]["id"], "B");
}

#[test]
fn test_pin_without_task_fails() {
    let dir = setup_project();

    horizon_cmd()
        .current_dir(dir.path())
        .args(["focus", "--pin"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--pin needs a task"));
}

// =============================================================================
// Snapshot Source Tests
// =============================================================================

#[test]
fn test_graph_flag_outside_project() {
    let dir = TempDir::new().unwrap();
    let graph = dir.path().join("board.yaml");
    fs::write(
        &graph,
        r#"
nodes:
  - id: x1
    estimate: 1d
  - id: x2
    estimate: 2d
  - id: y1
    estimate: 3d
  - id: y2
    estimate: 4d
  - id: z
    estimate: 2d
edges:
  - { from: x1, to: x2 }
  - { from: y1, to: y2 }
  - { from: x2, to: z }
  - { from: y2, to: z }
"#,
    )
    .unwrap();

    let json = json_stdout(
        horizon_cmd()
            .current_dir(dir.path())
            .args(["focus", "z", "--format", "json", "--graph"])
            .arg(&graph)
            .assert()
            .success(),
    );

    assert_eq!(json["times"][0]["metric"]["serial_sum"], 12.0);
    assert_eq!(json["times"][0]["metric"]["critical_min"], 9.0);
    let frontier: Vec<&str> = json["frontier"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_str().unwrap())
        .collect();
    assert_eq!(frontier, vec!["x1", "y1"]);
}

#[test]
fn test_graph_from_env() {
    let dir = TempDir::new().unwrap();
    let graph = dir.path().join("graph.json");
    fs::write(
        &graph,
        r#"{"nodes": [{"id": "a", "estimate": "1d"}, {"id": "b", "estimate": "1d"}],
            "edges": [{"prerequisite_id": "a", "dependent_id": "b"}]}"#,
    )
    .unwrap();

    horizon_cmd()
        .current_dir(dir.path())
        .env("HORIZON_GRAPH", &graph)
        .args(["frontier", "b"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Frontier for b (1)"));
}

#[test]
fn test_unsupported_graph_format() {
    let dir = TempDir::new().unwrap();
    let graph = dir.path().join("graph.csv");
    fs::write(&graph, "a,b\n").unwrap();

    horizon_cmd()
        .args(["check", "--graph"])
        .arg(&graph)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported snapshot format"));
}

#[test]
fn test_configured_graph_path() {
    let dir = setup_project();
    fs::write(
        dir.path().join(".horizon/config.toml"),
        "graph = \"exports/board.json\"\nfocus = \"b\"\n",
    )
    .unwrap();
    fs::create_dir_all(dir.path().join("exports")).unwrap();
    fs::write(
        dir.path().join("exports/board.json"),
        r#"{"nodes": [{"id": "a"}, {"id": "b"}], "edges": [{"from": "a", "to": "b"}]}"#,
    )
    .unwrap();

    horizon_cmd()
        .current_dir(dir.path())
        .arg("frontier")
        .assert()
        .success()
        .stdout(predicate::str::contains("Frontier for b (1)"));
}

// =============================================================================
// Check Tests
// =============================================================================

#[test]
fn test_check_clean_graph() {
    let dir = setup_project();
    write_scenario(dir.path());

    horizon_cmd()
        .current_dir(dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Tasks: 3  Dependencies: 2"))
        .stdout(predicate::str::contains("No problems found"));
}

#[test]
fn test_check_reports_problems() {
    let dir = setup_project();
    fs::write(
        dir.path().join(".horizon/tasks.jsonl"),
        r#"{"id": "a", "estimate": "1d", "depends_on": ["b"]}
{"id": "b", "estimate": "1d", "depends_on": ["a"]}
{"id": "c", "depends_on": ["ghost"]}
"#,
    )
    .unwrap();

    let json = json_stdout(
        horizon_cmd()
            .current_dir(dir.path())
            .args(["check", "--format", "json"])
            .assert()
            .success(),
    );

    assert_eq!(json["cycles"][0], serde_json::json!(["a", "b"]));
    assert_eq!(json["dangling"][0]["prerequisite_id"], "ghost");
    assert_eq!(json["needs_estimate"], serde_json::json!(["c"]));
}

#[test]
fn test_cyclic_graph_still_answers() {
    let dir = setup_project();
    fs::write(
        dir.path().join(".horizon/tasks.jsonl"),
        r#"{"id": "a", "estimate": "1d", "depends_on": ["a", "b"]}
{"id": "b", "estimate": "1d", "depends_on": ["a"]}
{"id": "goal", "estimate": "1d", "depends_on": ["b"]}
"#,
    )
    .unwrap();

    horizon_cmd()
        .current_dir(dir.path())
        .args(["focus", "goal"])
        .timeout(std::time::Duration::from_secs(10))
        .assert()
        .success();
}

#[test]
fn test_verbose_logs_to_stderr() {
    let dir = setup_project();
    write_scenario(dir.path());

    let assert = horizon_cmd()
        .current_dir(dir.path())
        .args(["frontier", "C", "--format", "json", "--verbose"])
        .assert()
        .success()
        .stderr(predicate::str::contains("frontier computed"));

    // stdout stays valid JSON
    json_stdout(assert);
}
