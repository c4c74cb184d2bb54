//! End-to-end runs of the `cgraph` binary.

use std::io::Write;
use std::process::{Command, Output};

use tempfile::NamedTempFile;

// ==================== CLI Helpers ====================

/// Run the `cgraph` CLI with the given arguments and return the output.
fn run_cgraph(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cgraph"))
        .args(args)
        .output()
        .expect("Failed to run cgraph")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "cgraph failed with {:?}: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn elements_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        br#"{
            "elements": {
                "nodes": [
                    { "data": { "id": "box" } },
                    { "data": { "id": "a", "parent": "box", "w": 3 } },
                    { "data": { "id": "b", "parent": "box", "w": 1 } },
                    { "data": { "id": "b" } }
                ],
                "edges": [
                    { "data": { "id": "ab", "source": "a", "target": "b" } },
                    { "data": { "id": "dangling", "source": "a", "target": "zz" } }
                ]
            }
        }"#,
    )
    .unwrap();
    file
}

fn path(file: &NamedTempFile) -> &str {
    file.path().to_str().unwrap()
}

// ==================== Commands ====================

#[test]
fn test_info_json() {
    let file = elements_file();
    let output = run_cgraph(&["--format", "json", "info", path(&file)]);
    assert_success(&output);
    let info: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(info["nodes"], 3);
    assert_eq!(info["edges"], 1);
    assert_eq!(info["discarded"], 2);
}

#[test]
fn test_query_text() {
    let file = elements_file();
    let output = run_cgraph(&["query", path(&file), "#box > node[w > 2]"]);
    assert_success(&output);
    let text = stdout(&output);
    assert!(text.contains("Matches (1):"));
    assert!(text.contains("a [node]"));
}

#[test]
fn test_parents_and_neighbors() {
    let file = elements_file();
    let output = run_cgraph(&["--format", "json", "parents", path(&file), "a"]);
    assert_success(&output);
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["ancestors"], serde_json::json!(["box"]));

    let output = run_cgraph(&["--format", "json", "neighbors", path(&file), "a"]);
    assert_success(&output);
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["nodes"], serde_json::json!(["b"]));
    assert_eq!(value["edges"], serde_json::json!(["ab"]));
}

#[test]
fn test_check_reports_discards() {
    let file = elements_file();
    let output = run_cgraph(&["check", path(&file)]);
    assert_success(&output);
    let text = stdout(&output);
    assert!(text.contains("duplicate id 'b' in nodes"));
    assert!(text.contains("unknown node 'zz'"));
}

#[test]
fn test_export_roundtrip() {
    let file = elements_file();
    let output = run_cgraph(&["export", path(&file)]);
    assert_success(&output);
    let exported: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(exported["nodes"].as_array().map(Vec::len), Some(3));
    assert_eq!(exported["nodes"][1]["data"]["parent"], "box");
}

// ==================== Exit Codes ====================

#[test]
fn test_missing_file_exit_code() {
    let output = run_cgraph(&["info", "/nonexistent/graph.json"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_bad_selector_exit_code() {
    let file = elements_file();
    let output = run_cgraph(&["query", path(&file), "node["]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_unknown_element_exit_code() {
    let file = elements_file();
    let output = run_cgraph(&["get", path(&file), "nope"]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_invalid_json_exit_code() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"{ not json").unwrap();
    let output = run_cgraph(&["info", path(&file)]);
    assert_eq!(output.status.code(), Some(2));
}
