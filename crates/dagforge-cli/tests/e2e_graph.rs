//! End-to-end tests for `dagf`: every command runs as a real process against
//! a temporary project directory.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn dagf_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dagf"));
    cmd.current_dir(dir);
    cmd.env("DAGFORGE_LOG", "error");
    cmd.env_remove("FORMAT");
    cmd.env("XDG_CONFIG_HOME", dir.join(".no-user-config"));
    cmd
}

fn init_project() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    dagf_cmd(dir.path()).arg("init").assert().success();
    dir
}

fn json_of(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is valid JSON")
}

fn add_node(dir: &Path, label: &str) -> String {
    let output = dagf_cmd(dir)
        .args(["node", "add", label, "--json"])
        .output()
        .expect("node add should not crash");
    assert!(
        output.status.success(),
        "node add failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    json_of(&output)["id"]
        .as_str()
        .expect("id must exist")
        .to_string()
}

fn add_edge(dir: &Path, from: &str, to: &str) {
    dagf_cmd(dir)
        .args(["edge", "add", from, to])
        .assert()
        .success();
}

fn show(dir: &Path) -> Value {
    let output = dagf_cmd(dir)
        .args(["show", "--json"])
        .output()
        .expect("show should not crash");
    assert!(output.status.success());
    json_of(&output)
}

fn error_code(stderr: &[u8]) -> String {
    let value: Value = serde_json::from_slice(stderr).expect("stderr is valid JSON");
    value["error"]["error_code"]
        .as_str()
        .expect("error_code present")
        .to_string()
}

// ---------------------------------------------------------------------------
// Project lifecycle
// ---------------------------------------------------------------------------

#[test]
fn init_creates_project_and_refuses_second_init() {
    let dir = init_project();
    assert!(dir.path().join(".dagforge/graph.json").is_file());
    assert!(dir.path().join(".dagforge/config.toml").is_file());

    dagf_cmd(dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    let output = dagf_cmd(dir.path())
        .args(["init", "--json"])
        .output()
        .unwrap();
    assert_eq!(error_code(&output.stderr), "E1003");

    dagf_cmd(dir.path()).args(["init", "--force"]).assert().success();
}

#[test]
fn commands_outside_a_project_fail_with_not_initialized() {
    let dir = TempDir::new().unwrap();
    let output = dagf_cmd(dir.path())
        .args(["show", "--json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(error_code(&output.stderr), "E1001");
}

#[test]
fn dir_flag_targets_another_project() {
    let project = init_project();
    let elsewhere = TempDir::new().unwrap();

    dagf_cmd(elsewhere.path())
        .args(["node", "add", "Remote", "--dir"])
        .arg(project.path())
        .assert()
        .success();
    assert_eq!(show(project.path())["nodes"][0]["label"], "Remote");
}

// ---------------------------------------------------------------------------
// Nodes and edges
// ---------------------------------------------------------------------------

#[test]
fn nodes_and_edges_persist_between_invocations() {
    let dir = init_project();
    let a = add_node(dir.path(), "  Fetch ");
    let b = add_node(dir.path(), "Build");
    add_edge(dir.path(), &a, &b);

    let graph = show(dir.path());
    assert_eq!(graph["nodes"].as_array().unwrap().len(), 2);
    assert_eq!(graph["nodes"][0]["label"], "Fetch");
    assert_eq!(graph["edges"][0]["from"], a.as_str());
    assert_eq!(graph["edges"][0]["to"], b.as_str());
    assert_eq!(graph["roots"][0], a.as_str());
    assert_eq!(graph["leaves"][0], b.as_str());
}

#[test]
fn cycle_is_rejected_and_graph_unchanged() {
    let dir = init_project();
    let a = add_node(dir.path(), "A");
    let b = add_node(dir.path(), "B");
    let c = add_node(dir.path(), "C");
    add_edge(dir.path(), &a, &b);
    add_edge(dir.path(), &b, &c);

    let output = dagf_cmd(dir.path())
        .args(["edge", "add", &c, &a, "--json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(error_code(&output.stderr), "E2007");
    assert_eq!(show(dir.path())["edges"].as_array().unwrap().len(), 2);
}

#[test]
fn self_loop_and_duplicate_are_rejected() {
    let dir = init_project();
    let a = add_node(dir.path(), "A");
    let b = add_node(dir.path(), "B");

    dagf_cmd(dir.path())
        .args(["edge", "add", &a, &a, "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2005"));

    add_edge(dir.path(), &a, &b);
    dagf_cmd(dir.path())
        .args(["edge", "add", &a, &b, "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2006"));
    assert_eq!(show(dir.path())["edges"].as_array().unwrap().len(), 1);
}

#[test]
fn deleting_a_node_cascades_its_edges() {
    let dir = init_project();
    let a = add_node(dir.path(), "A");
    let b = add_node(dir.path(), "B");
    let c = add_node(dir.path(), "C");
    add_edge(dir.path(), &a, &b);
    add_edge(dir.path(), &b, &c);

    let output = dagf_cmd(dir.path())
        .args(["node", "rm", &b, "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(json_of(&output)["edges_removed"], 2);

    let graph = show(dir.path());
    let labels: Vec<&str> = graph["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, ["A", "C"]);
    assert!(graph["edges"].as_array().unwrap().is_empty());
}

#[test]
fn move_and_rename_update_the_node() {
    let dir = init_project();
    let a = add_node(dir.path(), "A");

    dagf_cmd(dir.path())
        .args(["node", "move", &a, "-15", "7.5"])
        .assert()
        .success();
    dagf_cmd(dir.path())
        .args(["node", "rename", &a, "Alpha"])
        .assert()
        .success();

    let node = &show(dir.path())["nodes"][0];
    assert_eq!(node["label"], "Alpha");
    assert_eq!(node["position"]["x"], -15.0);
    assert_eq!(node["position"]["y"], 7.5);
}

#[test]
fn blank_labels_and_non_finite_positions_are_rejected() {
    let dir = init_project();
    let a = add_node(dir.path(), "A");

    let output = dagf_cmd(dir.path())
        .args(["node", "add", "   ", "--json"])
        .output()
        .unwrap();
    assert_eq!(error_code(&output.stderr), "E2001");

    let output = dagf_cmd(dir.path())
        .args(["node", "move", &a, "NaN", "0", "--json"])
        .output()
        .unwrap();
    assert_eq!(error_code(&output.stderr), "E2008");

    let output = dagf_cmd(dir.path())
        .args(["node", "rm", "n404", "--json"])
        .output()
        .unwrap();
    assert_eq!(error_code(&output.stderr), "E2002");
}

#[test]
fn deleted_ids_are_not_handed_out_again() {
    let dir = init_project();
    add_node(dir.path(), "A");
    let b = add_node(dir.path(), "B");
    dagf_cmd(dir.path()).args(["node", "rm", &b]).assert().success();

    let c = add_node(dir.path(), "C");
    assert_ne!(c, b);

    dagf_cmd(dir.path()).arg("clear").assert().success();
    let d = add_node(dir.path(), "D");
    assert!(![b.as_str(), c.as_str(), "n1"].contains(&d.as_str()), "reissued {d}");
}

#[test]
fn text_mode_prints_bare_ids() {
    let dir = init_project();
    dagf_cmd(dir.path())
        .args(["node", "add", "A", "--format", "text"])
        .assert()
        .success()
        .stdout("n1\n");
}

#[test]
fn show_topo_orders_dependencies_first() {
    let dir = init_project();
    let a = add_node(dir.path(), "A");
    let b = add_node(dir.path(), "B");
    let c = add_node(dir.path(), "C");
    add_edge(dir.path(), &c, &b);
    add_edge(dir.path(), &b, &a);

    let output = dagf_cmd(dir.path())
        .args(["show", "--topo", "--json"])
        .output()
        .unwrap();
    let order: Vec<String> = json_of(&output)["order"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert_eq!(order, [c, b, a]);
}

#[test]
fn clear_empties_the_graph() {
    let dir = init_project();
    let a = add_node(dir.path(), "A");
    let b = add_node(dir.path(), "B");
    add_edge(dir.path(), &a, &b);

    dagf_cmd(dir.path())
        .args(["clear", "--format", "text"])
        .assert()
        .success()
        .stdout("2\t1\n");
    let graph = show(dir.path());
    assert!(graph["nodes"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Export / import
// ---------------------------------------------------------------------------

#[test]
fn export_then_import_round_trips() {
    let source = init_project();
    let a = add_node(source.path(), "A");
    let b = add_node(source.path(), "B");
    let c = add_node(source.path(), "C");
    add_edge(source.path(), &a, &b);
    add_edge(source.path(), &b, &c);

    let snapshot = source.path().join("snapshot.json");
    dagf_cmd(source.path())
        .args(["export", "--output"])
        .arg(&snapshot)
        .assert()
        .success();

    let target = init_project();
    dagf_cmd(target.path())
        .arg("import")
        .arg(&snapshot)
        .assert()
        .success();

    let before = show(source.path());
    let after = show(target.path());
    assert_eq!(before["nodes"], after["nodes"]);
    assert_eq!(before["edges"], after["edges"]);
}

#[test]
fn export_to_stdout_is_the_exchange_document() {
    let dir = init_project();
    add_node(dir.path(), "A");

    let output = dagf_cmd(dir.path())
        .args(["export", "--compact"])
        .output()
        .unwrap();
    let text = String::from_utf8(output.stdout).unwrap();
    assert_eq!(text.lines().count(), 1);
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["nodes"][0]["id"], "n1");
    assert!(value["edges"].as_array().unwrap().is_empty());
}

#[test]
fn import_with_dangling_edge_keeps_current_graph() {
    let dir = init_project();
    let a = add_node(dir.path(), "A");
    let before = std::fs::read_to_string(dir.path().join(".dagforge/graph.json")).unwrap();

    let bad = dir.path().join("bad.json");
    std::fs::write(
        &bad,
        r#"{"nodes":[{"id":"x","label":"X","position":{"x":0,"y":0}}],"edges":[{"from":"x","to":"ghost"}]}"#,
    )
    .unwrap();

    let output = dagf_cmd(dir.path())
        .args(["import", "--json"])
        .arg(&bad)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(error_code(&output.stderr), "E3001");

    let after = std::fs::read_to_string(dir.path().join(".dagforge/graph.json")).unwrap();
    assert_eq!(before, after);
    assert_eq!(show(dir.path())["nodes"][0]["id"], a.as_str());
}

#[test]
fn import_reads_stdin() {
    let dir = init_project();
    dagf_cmd(dir.path())
        .args(["import", "-", "--format", "text"])
        .write_stdin(
            r#"{"nodes":[{"id":"a","label":"A","position":{"x":0,"y":0}},
                         {"id":"b","label":"B","position":{"x":1,"y":1}}],
               "edges":[{"from":"a","to":"b"}]}"#,
        )
        .assert()
        .success()
        .stdout("2\t1\n");
}

#[test]
fn completions_are_generated() {
    let dir = TempDir::new().unwrap();
    dagf_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dagf"));
}
