//! Integration tests for `helmdoc.toml` handling.

use helmdoc::chart::ChartDependency;
use helmdoc::test_utils::ChartFixture;
use predicates::prelude::*;

use crate::common::{ChartWorkspace, chart_entry, helmdoc_cmd};

fn cyclic_workspace() -> ChartWorkspace {
    let ws = ChartWorkspace::new();
    ws.chart(
        "a",
        ChartFixture::new("a", "1.0.0").dependency(ChartDependency::new("a", "1.0.0", "file://.")),
    );
    ws
}

#[test]
fn test_config_in_search_root_is_used() {
    let ws = cyclic_workspace();
    ws.write("helmdoc.toml", "on_cycle = \"skip\"\n");

    ws.helmdoc(&["deps"]).assert().success().stdout(predicate::str::contains("circular reference"));
}

#[test]
fn test_cli_flag_overrides_config() {
    let ws = cyclic_workspace();
    ws.write("helmdoc.toml", "on_cycle = \"skip\"\n");

    ws.helmdoc(&["deps", "--on-cycle", "error"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Circular dependency detected"));
}

#[test]
fn test_config_from_environment() {
    let ws = cyclic_workspace();
    let elsewhere = tempfile::TempDir::new().unwrap();
    let config = elsewhere.path().join("custom.toml");
    std::fs::write(&config, "on_cycle = \"skip\"\n").unwrap();

    helmdoc_cmd()
        .env("HELMDOC_CONFIG", &config)
        .arg("deps")
        .arg(ws.root())
        .assert()
        .success();
}

#[test]
fn test_ignore_patterns() {
    let ws = ChartWorkspace::new();
    ws.chart("app", ChartFixture::new("app", "1.0.0"));
    ws.chart("vendor/upstream", ChartFixture::new("upstream", "1.0.0"));
    ws.write("helmdoc.toml", "ignore = [\"vendor\"]\n");

    let output = ws.helmdoc(&["deps", "--format", "json"]).output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 1);
    chart_entry(&json, "app");
}

#[test]
fn test_values_file_from_config() {
    let ws = ChartWorkspace::new();
    ws.chart(
        "app",
        ChartFixture::new("app", "1.0.0").values("replicas: 1\n").file("values.dev.yaml", "replicas: 2\n"),
    );
    ws.write("helmdoc.toml", "values_file = \"values.dev.yaml\"\n");

    ws.helmdoc(&["values"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"replicas\s+int\s+2").unwrap());
}

#[test]
fn test_missing_explicit_config_fails() {
    let ws = ChartWorkspace::new();
    ws.chart("app", ChartFixture::new("app", "1.0.0"));

    ws.helmdoc(&["deps", "--config", "/nonexistent/helmdoc.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_invalid_config_fails() {
    let ws = ChartWorkspace::new();
    ws.chart("app", ChartFixture::new("app", "1.0.0"));
    ws.write("helmdoc.toml", "unknown_key = true\n");

    ws.helmdoc(&["deps"]).assert().failure().code(1);
}
