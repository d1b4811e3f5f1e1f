//! End-to-end runs of the `apidoc` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const PING_API: &str = r#"
info:
  title: Ping
  version: "1"
service:
  name: ping
  groups:
    - annotation: { group: health }
      routes:
        - method: get
          path: /ping/:id
          handler: Ping
          requestType: PingReq
          responseType: Pong
types:
  - name: PingReq
    members:
      - { name: Id, type: int64, tag: 'path:"id"' }
  - name: Pong
    members:
      - { name: Message, type: string, tag: 'json:"message"' }
"#;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("apidoc"))
}

fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn writes_json_file_and_reports_path() {
    let dir = TempDir::new().unwrap();
    let input = write_temp_file(&dir, "api.yaml", PING_API);
    let output = dir.path().join("openapi");

    cmd()
        .args(["-i", input.to_str().unwrap(), "-o", output.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated OpenAPI document at"))
        .stdout(predicate::str::contains("openapi.json"));

    let written = fs::read_to_string(dir.path().join("openapi.json")).unwrap();
    let doc: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(doc["openapi"], json!("3.0.3"));
    assert_eq!(doc["info"]["title"], json!("Ping"));
    assert_eq!(
        doc["paths"]["/ping/{id}"]["get"]["responses"]["200"],
        json!({ "$ref": "#/components/responses/Pong" })
    );
    assert_eq!(
        doc["components"]["schemas"]["Pong"]["required"],
        json!(["message"])
    );
}

#[test]
fn stdout_output_is_the_document_only() {
    let dir = TempDir::new().unwrap();
    let input = write_temp_file(&dir, "api.yaml", PING_API);

    let assert = cmd()
        .args(["-i", input.to_str().unwrap(), "-o", "-"])
        .assert()
        .success();
    let doc: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(doc["paths"]["/ping/{id}"]["get"]["operationId"], json!("Ping"));
}

#[test]
fn reads_stdin_and_writes_yaml() {
    cmd()
        .args(["-o", "-", "-f", "yaml"])
        .write_stdin(PING_API)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("openapi: 3.0.3\n"))
        .stdout(predicate::str::contains("title: Ping"));
}

#[test]
fn warnings_go_to_stderr() {
    let dir = TempDir::new().unwrap();
    let input = write_temp_file(
        &dir,
        "api.yaml",
        r#"
service:
  name: broken
  groups:
    - routes:
        - method: get
          path: /x
          handler: X
          responseType: Missing
"#,
    );

    cmd()
        .args(["-i", input.to_str().unwrap(), "-o", "-"])
        .env("RUST_LOG", "warn")
        .assert()
        .success()
        .stderr(predicate::str::contains("Missing"));
}

#[test]
fn missing_input_fails() {
    let dir = TempDir::new().unwrap();
    cmd()
        .args(["-i", dir.path().join("nope.yaml").to_str().unwrap(), "-o", "-"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}
