//! CLI integration tests for json-coverage binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const FIXTURE_SCHEMA: &str = "tests/fixtures/topic-stats.schema.json";

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("json-coverage"))
}

// Helper to create a temp file
fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const ABC_SCHEMA: &str = r#"{
    "type": "object",
    "properties": {
        "a": { "type": "string" },
        "b": { "type": "string" },
        "c": { "type": "string" }
    }
}"#;

mod check_command {
    use super::*;

    #[test]
    fn complete_payload() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", ABC_SCHEMA);
        let payload = write_temp_file(&dir, "payload.json", r#"{"a":"1","b":"2","c":"3"}"#);

        cmd()
            .args([
                "check",
                payload.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("Complete"));
    }

    #[test]
    fn missing_field_reported() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", ABC_SCHEMA);
        let payload = write_temp_file(&dir, "payload.json", r#"{"a":"1","b":"2"}"#);

        cmd()
            .args([
                "check",
                payload.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Incomplete: 1 missing field(s)"))
            .stderr(predicate::str::contains("  .c"));
    }

    #[test]
    fn json_output_incomplete() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", ABC_SCHEMA);
        let payload = write_temp_file(&dir, "payload.json", r#"{"b":"2"}"#);

        cmd()
            .args([
                "check",
                payload.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
                "--json",
            ])
            .assert()
            .code(1)
            .stdout(predicate::str::contains(
                r#"{"matched":false,"missing":[".a",".c"]}"#,
            ));
    }

    #[test]
    fn json_output_complete() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", ABC_SCHEMA);
        let payload = write_temp_file(&dir, "payload.json", r#"{"a":1,"b":2,"c":3,"d":4}"#);

        cmd()
            .args([
                "check",
                payload.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
                "--json",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#"{"matched":true,"missing":[]}"#));
    }

    #[test]
    fn quiet_only_sets_exit_code() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", ABC_SCHEMA);
        let payload = write_temp_file(&dir, "payload.json", r#"{}"#);

        cmd()
            .args([
                "check",
                payload.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
                "--quiet",
            ])
            .assert()
            .code(1)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::is_empty());
    }

    #[test]
    fn fixture_complete() {
        cmd()
            .args([
                "check",
                "tests/fixtures/topic-stats.json",
                "--schema",
                FIXTURE_SCHEMA,
            ])
            .assert()
            .success();
    }

    #[test]
    fn fixture_partial() {
        cmd()
            .args([
                "check",
                "tests/fixtures/topic-stats-partial.json",
                "--schema",
                FIXTURE_SCHEMA,
                "--json",
            ])
            .assert()
            .code(1)
            .stdout(predicate::str::contains(
                r#"{"matched":false,"missing":[".totalSize",".ledgers[1].offloaded",".cursors[\"sub-1\"].pendingReadOps",".compactedLedger"]}"#,
            ));
    }

    #[test]
    fn fixture_partial_allow_omitempty() {
        cmd()
            .args([
                "check",
                "tests/fixtures/topic-stats-partial.json",
                "--schema",
                FIXTURE_SCHEMA,
                "--allow-omitempty",
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Incomplete: 3 missing field(s)"))
            .stderr(predicate::str::contains(".compactedLedger").not());
    }
}

mod fields_command {
    use super::*;

    #[test]
    fn lists_declared_paths() {
        cmd()
            .args(["fields", "--schema", FIXTURE_SCHEMA])
            .assert()
            .success()
            .stdout(predicate::str::starts_with(".entriesAddedCounter\n"))
            .stdout(predicate::str::contains(".ledgers[].offloaded\n"))
            .stdout(predicate::str::contains(".cursors[*].readPosition\n"))
            .stdout(predicate::str::contains(".compactedLedger.ledgerId\n"))
            .stdout(predicate::str::contains("internalNotes").not());
    }

    #[test]
    fn non_object_schema_rejected() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", r#"{"type":"array"}"#);

        cmd()
            .args(["fields", "--schema", schema.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("not an object-like type"));
    }
}

mod error_handling {
    use super::*;

    #[test]
    fn schema_not_found() {
        let dir = TempDir::new().unwrap();
        let payload = write_temp_file(&dir, "payload.json", r#"{}"#);

        cmd()
            .args([
                "check",
                payload.to_str().unwrap(),
                "--schema",
                "/nonexistent/schema.json",
            ])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("not found"));
    }

    #[test]
    fn payload_not_found_json_output() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", ABC_SCHEMA);

        cmd()
            .args([
                "check",
                "/nonexistent/payload.json",
                "--schema",
                schema.to_str().unwrap(),
                "--json",
            ])
            .assert()
            .code(3)
            .stdout(predicate::str::contains(r#""matched":false"#))
            .stdout(predicate::str::contains(r#""error":"#));
    }

    #[test]
    fn malformed_payload() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", ABC_SCHEMA);
        let payload = write_temp_file(&dir, "payload.json", r#"{ "a": "#);

        cmd()
            .args([
                "check",
                payload.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
            ])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("invalid JSON"));
    }

    #[test]
    fn non_object_payload() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", ABC_SCHEMA);
        let payload = write_temp_file(&dir, "payload.json", r#"[1, 2, 3]"#);

        cmd()
            .args([
                "check",
                payload.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
            ])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("expected a JSON object"));
    }

    #[test]
    fn invalid_coverage_annotation() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(
            &dir,
            "schema.json",
            r#"{"type":"object","properties":{"a":{"x-coverage":"maybe"}}}"#,
        );
        let payload = write_temp_file(&dir, "payload.json", r#"{}"#);

        cmd()
            .args([
                "check",
                payload.to_str().unwrap(),
                "--schema",
                schema.to_str().unwrap(),
            ])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("unknown x-coverage"));
    }
}

mod required_args {
    use super::*;

    #[test]
    fn missing_schema_flag() {
        cmd()
            .args(["check", "payload.json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--schema"));
    }

    #[test]
    fn missing_payload() {
        cmd()
            .args(["check", "--schema", "schema.json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("PAYLOAD"));
    }

    #[test]
    fn quiet_conflicts_with_json() {
        cmd()
            .args(["check", "p.json", "--schema", "s.json", "--json", "--quiet"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("cannot be used with"));
    }
}

mod help_and_version {
    use super::*;

    #[test]
    fn help_flag() {
        cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "Check that a JSON document contains every field",
            ));
    }

    #[test]
    fn version_flag() {
        cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("json-coverage"));
    }

    #[test]
    fn check_help() {
        cmd()
            .args(["check", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--schema"))
            .stdout(predicate::str::contains("--allow-omitempty"));
    }
}

#[cfg(feature = "remote")]
mod remote {
    use super::*;

    #[test]
    fn schema_from_url() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/schema.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(ABC_SCHEMA)
            .create();

        let dir = TempDir::new().unwrap();
        let payload = write_temp_file(&dir, "payload.json", r#"{"a":"1","c":"3"}"#);

        cmd()
            .args([
                "check",
                payload.to_str().unwrap(),
                "--schema",
                &format!("{}/schema.json", server.url()),
                "--json",
            ])
            .assert()
            .code(1)
            .stdout(predicate::str::contains(r#""missing":[".b"]"#));
    }

    #[test]
    fn schema_url_404() {
        let mut server = mockito::Server::new();
        let _mock = server.mock("GET", "/gone.json").with_status(404).create();

        cmd()
            .args([
                "fields",
                "--schema",
                &format!("{}/gone.json", server.url()),
            ])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("failed to fetch"));
    }
}
