//! Integration tests for `helmdoc values`.

use helmdoc::chart::ChartDependency;
use helmdoc::test_utils::ChartFixture;
use predicates::prelude::*;

use crate::common::{ChartWorkspace, chart_entry, standard_workspace};

fn values_json(ws: &ChartWorkspace, extra: &[&str]) -> serde_json::Value {
    let mut args = vec!["values", "--format", "json"];
    args.extend_from_slice(extra);
    let output = ws.helmdoc(&args).output().unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_sub_chart_values_are_prefixed() {
    let ws = standard_workspace();
    let json = values_json(&ws, &[]);

    let rows = chart_entry(&json, "app")["values"].as_array().unwrap().clone();
    let keys: Vec<&str> = rows.iter().map(|r| r["key"].as_str().unwrap()).collect();
    assert_eq!(
        keys,
        vec!["replicas", "redis.port", "redis.metrics.enabled", "shared.labels", "db.port"]
    );

    assert_eq!(rows[0]["description"], "Number of pods");
    assert_eq!(rows[1]["description"], "Redis port");
    assert_eq!(rows[1]["default"], "6379");
    assert_eq!(rows[2]["type"], "bool");
    assert_eq!(rows[3]["default"], "{}");
    assert_eq!(rows[4]["type"], "int");
    assert_eq!(rows[4]["description"], "Database port");
}

#[test]
fn test_text_table() {
    let ws = standard_workspace();

    ws.helmdoc(&["values"])
        .assert()
        .success()
        .stdout(predicate::str::contains("KEY"))
        .stdout(predicate::str::contains("DESCRIPTION"))
        .stdout(predicate::str::is_match(r"redis\.port\s+int\s+6379\s+Redis port").unwrap())
        .stdout(predicate::str::is_match(r"db\.port\s+int\s+5432\s+Database port").unwrap());
}

#[test]
fn test_default_override_and_declared_type() {
    let ws = ChartWorkspace::new();
    ws.chart(
        "app",
        ChartFixture::new("app", "1.0.0").values(
            "# -- (string) Image tag\n# @default -- the chart appVersion\ntag: \"\"\n",
        ),
    );

    let json = values_json(&ws, &[]);
    let row = &chart_entry(&json, "app")["values"][0];
    assert_eq!(row["key"], "tag");
    assert_eq!(row["type"], "string");
    assert_eq!(row["default"], "the chart appVersion");
    assert_eq!(row["description"], "Image tag");
}

#[test]
fn test_values_file_flag() {
    let ws = ChartWorkspace::new();
    ws.chart(
        "app",
        ChartFixture::new("app", "1.0.0")
            .values("replicas: 1\n")
            .file("values.prod.yaml", "replicas: 5\n"),
    );

    let json = values_json(&ws, &["--values-file", "values.prod.yaml"]);
    assert_eq!(chart_entry(&json, "app")["values"][0]["default"], "5");
}

#[test]
fn test_skipped_dependencies_are_reported() {
    let ws = ChartWorkspace::new();
    ws.chart(
        "app",
        ChartFixture::new("app", "1.0.0")
            .values("replicas: 1\n")
            .dependency(ChartDependency::new("redis", "17.0.0", "https://charts.bitnami.com/bitnami")),
    );

    let json = values_json(&ws, &[]);
    let app = chart_entry(&json, "app");
    assert_eq!(app["values"].as_array().unwrap().len(), 1);
    assert_eq!(app["skipped"][0]["dependency"]["name"], "redis");

    ws.helmdoc(&["values"])
        .assert()
        .success()
        .stdout(predicate::str::contains("skipped redis"));
}

#[test]
fn test_invalid_values_yaml_is_logged_and_left_out() {
    let ws = ChartWorkspace::new();
    ws.chart("good", ChartFixture::new("good", "1.0.0").values("a: 1\n"));
    ws.chart("bad", ChartFixture::new("bad", "1.0.0").values("a: [unclosed\n"));

    let json = values_json(&ws, &[]);
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["chart"], "good");
}

#[test]
fn test_cyclic_chart_does_not_hide_other_charts() {
    let ws = ChartWorkspace::new();
    ws.chart(
        "loop",
        ChartFixture::new("loop", "1.0.0").dependency(ChartDependency::new("loop", "1.0.0", "file://.")),
    );
    ws.chart("zeta", ChartFixture::new("zeta", "1.0.0").values("# -- Zeta port\nport: 80\n"));

    ws.helmdoc(&["values"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_match(r"port\s+int\s+80\s+Zeta port").unwrap())
        .stderr(predicate::str::contains("Circular dependency detected"))
        .stderr(predicate::str::contains("Failed to resolve 1 of 2 charts"));
}
