//! End-to-end tests for the `sv` binary.
//!
//! Each test writes a registry and a record file to a temp directory and runs
//! the built binary against them.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

const REGISTRY: &str = r#"
[fields.age]
column = "p.age"
type = "int"

[fields.name]
column = "p.name"
type = "string"

[fields.team]
column = "t.name"
type = "string"
join = "JOIN teams t ON t.id = p.team_id"

[order.age]
column = "p.age"

[order.name]
column = "p.name"
"#;

const RECORDS: &str = r#"[
  {"name": "ada", "age": 36, "team": "core"},
  {"name": "grace", "age": 45, "team": "compilers"},
  {"name": "linus", "age": 28, "team": "core"},
  {"name": "barbara", "age": 36, "team": "theory"}
]"#;

struct Fixture {
    _dir: TempDir,
    registry: PathBuf,
    records: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let registry = dir.path().join("registry.toml");
        let records = dir.path().join("people.json");
        fs::write(&registry, REGISTRY).unwrap();
        fs::write(&records, RECORDS).unwrap();
        Self {
            _dir: dir,
            registry,
            records,
        }
    }

    fn sv(&self, args: &[&str]) -> Output {
        run_sv(Some(&self.registry), args)
    }
}

fn run_sv(registry: Option<&Path>, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sv"));
    cmd.env_remove("SIEVE_REGISTRY").env_remove("RUST_LOG");
    if let Some(path) = registry {
        cmd.arg("--registry").arg(path);
    }
    cmd.arg("--no-color").args(args);
    cmd.output().expect("failed to run sv")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({e}): {}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

fn names(records: &Value) -> Vec<&str> {
    records
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect()
}

// ===== check =====

#[test]
fn test_check_prints_tree() {
    let output = run_sv(
        None,
        &[
            "check",
            "age > 30 and (name sw `a` or name pt)",
            "--sorters",
            "-age",
        ],
    );
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("Filter: age > 30 and (name sw `a` or name pt)\n"));
    assert!(stdout.contains("  1. age DESC\n"), "{stdout}");
}

#[test]
fn test_check_syntax_error_json() {
    let output = run_sv(None, &["--json", "check", "age = 1 and (age = 2"]);
    assert_eq!(output.status.code(), Some(1));

    let err: Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(err["error"]["code"], "SYNTAX_ERROR");
}

// ===== compile =====

#[test]
fn test_compile_json() {
    let fixture = Fixture::new();
    let output = fixture.sv(&[
        "--json",
        "compile",
        "team eq `core` and age >= 30",
        "--sorters",
        "-age",
    ]);
    assert!(output.status.success(), "{:?}", output);

    let json = stdout_json(&output);
    assert_eq!(json["where_clause"], "t.name = ? AND p.age >= ?");
    assert_eq!(json["args"], serde_json::json!(["core", 30]));
    assert_eq!(json["joins"][0], "JOIN teams t ON t.id = p.team_id");
    assert_eq!(json["order_by"], "p.age DESC");
}

#[test]
fn test_compile_unknown_field_suggests() {
    let fixture = Fixture::new();
    let output = fixture.sv(&["compile", "nmae eq `x`"]);
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("did you mean 'name'?"), "{stderr}");
}

#[test]
fn test_compile_missing_registry() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");
    let output = run_sv(Some(&missing), &["compile", "age eq 1"]);
    assert_eq!(output.status.code(), Some(5));
}

// ===== query =====

#[test]
fn test_query_filters_sorts_and_pages() {
    let fixture = Fixture::new();
    let records = fixture.records.to_str().unwrap();
    let output = fixture.sv(&[
        "--json", "query", "age >= 30", "--sorters", "-age,name", "--input", records, "--limit",
        "2", "--count",
    ]);
    assert!(output.status.success(), "{:?}", output);

    let page = stdout_json(&output);
    assert_eq!(page["total"], 3);
    assert_eq!(names(&page["records"]), vec!["grace", "ada"]);
}

#[test]
fn test_query_without_filter_returns_all() {
    let fixture = Fixture::new();
    let records = fixture.records.to_str().unwrap();
    let output = fixture.sv(&["query", "--input", records]);
    assert!(output.status.success(), "{:?}", output);

    let json = stdout_json(&output);
    assert_eq!(json.as_array().unwrap().len(), 4);
}

// ===== registry =====

#[test]
fn test_registry_json() {
    let fixture = Fixture::new();
    let output = fixture.sv(&["--json", "registry"]);
    assert!(output.status.success(), "{:?}", output);

    let json = stdout_json(&output);
    assert_eq!(json["registry"]["fields"]["team"]["column"], "t.name");
    assert_eq!(json["registry"]["order"]["name"]["column"], "p.name");
}
