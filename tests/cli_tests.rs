//! Command-line tests run against the built binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

const CORPUS: &str = r#"{
  "version": "1.0.0",
  "layouts": [
    {"id": "two-box", "labels": [1, 2], "bounding_boxes": [[0.0, 0.0, 0.1, 0.1], [0.5, 0.5, 0.1, 0.1]]},
    {"id": "one-box", "labels": [1], "bounding_boxes": [[0.0, 0.0, 0.1, 0.1]]},
    {"id": "flat", "labels": [1, 2], "bounding_boxes": [[0.2, 0.2, 0.0, 0.0], [0.4, 0.4, 0.0, 0.0]]}
  ]
}"#;

const QUERY: &str =
    r#"{"labels": [1, 2], "bounding_boxes": [[0.0, 0.0, 0.1, 0.1], [0.5, 0.5, 0.1, 0.1]]}"#;

fn json_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".json").expect("Failed to create temp file");
    file.write_all(content.as_bytes()).expect("Failed to write temp file");
    file
}

fn cmd() -> Command {
    Command::cargo_bin("layout-exemplar").expect("binary should build")
}

#[test]
fn test_select_text_output() {
    let corpus = json_file(CORPUS);
    let query = json_file(QUERY);

    cmd()
        .arg("select")
        .arg(corpus.path())
        .arg(query.path())
        .args(["--task", "gent", "-k", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("basic-element"))
        .stdout(predicate::str::contains("two-box"))
        .stdout(predicate::str::contains("one-box").not());
}

#[test]
fn test_select_json_skips_degenerate() {
    let corpus = json_file(CORPUS);
    let query = json_file(QUERY);

    let output = cmd()
        .args(["--format", "json", "select"])
        .arg(corpus.path())
        .arg(query.path())
        .args(["--task", "basic-element", "-k", "5", "--seed", "3"])
        .output()
        .expect("failed to run");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["task"], "gent");
    assert_eq!(json["corpus_size"], 3);
    let ids: Vec<&str> = json["exemplars"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["two-box", "one-box"]);
}

#[test]
fn test_select_discretize_drops_sub_cell_layouts() {
    let corpus = json_file(
        r#"[
          {"id": "tiny", "labels": [1, 2], "bounding_boxes": [[0.0, 0.0, 0.001, 0.001], [0.5, 0.5, 0.001, 0.001]]},
          {"id": "one-box", "labels": [1], "bounding_boxes": [[0.0, 0.0, 0.1, 0.1]]}
        ]"#,
    );
    let query = json_file(QUERY);

    cmd()
        .args(["--format", "tsv", "select"])
        .arg(corpus.path())
        .arg(query.path())
        .args(["--task", "gent", "--discretize"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tiny").not())
        .stdout(predicate::str::contains("one-box"));
}

#[test]
fn test_select_unknown_task_fails() {
    let corpus = json_file(CORPUS);
    let query = json_file(QUERY);

    cmd()
        .arg("select")
        .arg(corpus.path())
        .arg(query.path())
        .args(["--task", "poster"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("poster"));
}

#[test]
fn test_select_missing_aspect_fails() {
    let corpus = json_file(CORPUS);
    let query = json_file(QUERY);

    cmd()
        .arg("select")
        .arg(corpus.path())
        .arg(query.path())
        .args(["--task", "content"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("discrete_content_bounding_boxes"));
}

#[test]
fn test_select_rejects_out_of_range_content_box() {
    let corpus = json_file(CORPUS);
    let query = json_file(
        r#"{"labels": [1], "bounding_boxes": [[0.0, 0.0, 0.1, 0.1]],
            "discrete_content_bounding_boxes": [[9223372036854775807, 0, 1, 1]]}"#,
    );

    cmd()
        .arg("select")
        .arg(corpus.path())
        .arg(query.path())
        .args(["--task", "content"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("discrete_content_bounding_boxes entry 0"));
}

#[test]
fn test_score_tsv() {
    let a = json_file(QUERY);
    let b = json_file(r#"{"labels": [1], "bounding_boxes": [[0.0, 0.0, 0.1, 0.1]]}"#);

    cmd()
        .args(["--format", "tsv", "score"])
        .arg(a.path())
        .arg(b.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("kind\tname\tscore"))
        .stdout(predicate::str::contains("aspect\tlabel\t0.666667"))
        .stdout(predicate::str::contains("task\tgent\t"))
        .stdout(predicate::str::contains("task\ttext").not());
}

#[test]
fn test_inspect_json() {
    let corpus = json_file(CORPUS);

    let output = cmd()
        .args(["inspect", "--format", "json"])
        .arg(corpus.path())
        .output()
        .expect("failed to run");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["layouts"], 3);
    assert_eq!(json["degenerate"], 1);
    assert_eq!(json["elements"]["max"], 2);
    assert_eq!(json["labels"]["1"], 3);
}

#[test]
fn test_invalid_corpus_reports_index() {
    let corpus = json_file(r#"[{"labels": [1, 2], "bounding_boxes": [[0.0, 0.0, 0.1, 0.1]]}]"#);

    cmd()
        .arg("inspect")
        .arg(corpus.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("index 0"));
}
