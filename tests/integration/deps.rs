//! Integration tests for `helmdoc deps`.

use helmdoc::chart::ChartDependency;
use helmdoc::test_utils::ChartFixture;
use predicates::prelude::*;
use std::path::PathBuf;

use crate::common::{ChartWorkspace, chart_entry, standard_workspace};

fn deps_json(ws: &ChartWorkspace, extra: &[&str]) -> serde_json::Value {
    let mut args = vec!["deps", "--format", "json"];
    args.extend_from_slice(extra);
    let output = ws.helmdoc(&args).output().unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_tree_shows_all_dependency_sources() {
    let ws = standard_workspace();

    ws.helmdoc(&["deps"])
        .assert()
        .success()
        .stdout(predicate::str::contains("app 1.0.0"))
        .stdout(predicate::str::contains("├── redis  redis"))
        .stdout(predicate::str::contains("│   └── redis.metrics  metrics"))
        .stdout(predicate::str::contains("├── shared  common"))
        .stdout(predicate::str::contains("└── db  postgresql"));
}

#[test]
fn test_json_preserves_pre_order_and_nesting() {
    let ws = standard_workspace();
    let json = deps_json(&ws, &[]);

    let app = chart_entry(&json, "app");
    let deps = app["dependencies"].as_array().unwrap();
    let prefixes: Vec<&str> = deps.iter().map(|d| d["prefix"].as_str().unwrap()).collect();
    assert_eq!(prefixes, vec!["redis", "shared", "db"]);

    assert_eq!(deps[0]["dependencies"][0]["prefix"], "redis.metrics");
    assert_eq!(deps[1]["chart"], "common");
    assert_eq!(deps[2]["chart"], "postgresql");
    assert_eq!(app["skipped"], serde_json::json!([]));

    // Vendored sub-charts are charts in their own right.
    let redis = chart_entry(&json, "redis");
    assert_eq!(redis["dependencies"][0]["prefix"], "metrics");
}

#[test]
fn test_unpacked_archives_are_removed_after_run() {
    let ws = standard_workspace();
    let json = deps_json(&ws, &[]);

    let db = &chart_entry(&json, "app")["dependencies"][2];
    let unpacked = PathBuf::from(db["directory"].as_str().unwrap());
    assert!(unpacked.ends_with("postgresql"));
    assert!(!unpacked.starts_with(ws.root()));
    assert!(!unpacked.exists());
}

#[test]
fn test_text_format() {
    let ws = standard_workspace();

    ws.helmdoc(&["deps", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\n  redis "))
        .stdout(predicate::str::contains("\n    redis.metrics "))
        .stdout(predicate::str::contains("\n  db "));
}

#[test]
fn test_chart_flag_limits_output() {
    let ws = standard_workspace();
    let app = ws.path("app");
    let json = deps_json(&ws, &["--chart", app.to_str().unwrap()]);

    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["chart"], "app");
}

#[test]
fn test_remote_dependency_without_archive_is_skipped() {
    let ws = ChartWorkspace::new();
    ws.chart(
        "app",
        ChartFixture::new("app", "1.0.0")
            .dependency(ChartDependency::new("nginx", "15.0.0", "https://charts.bitnami.com/bitnami"))
            .dependency(ChartDependency::new("common", "0.1.0", "file://../common")),
    );
    ws.chart("common", ChartFixture::new("common", "0.1.0"));

    ws.helmdoc(&["deps"])
        .assert()
        .success()
        .stdout(predicate::str::contains("└── common  common"))
        .stdout(predicate::str::contains("Skipped 1 dependency"))
        .stdout(predicate::str::contains("remote dependency without local archive"))
        .stderr(predicate::str::contains("has a remote dependency 'nginx'"));

    let json = deps_json(&ws, &[]);
    let skipped = &chart_entry(&json, "app")["skipped"][0];
    assert_eq!(skipped["reason"], "remote-without-archive");
    assert_eq!(skipped["dependency"]["name"], "nginx");
}

#[test]
fn test_corrupt_archive_is_skipped() {
    let ws = ChartWorkspace::new();
    ws.chart(
        "app",
        ChartFixture::new("app", "1.0.0")
            .dependency(ChartDependency::new("broken", "1.0.0", "oci://registry.example.com/charts")),
    );
    ws.write("app/charts/broken-1.0.0.tgz", "this is not a tarball");

    let json = deps_json(&ws, &[]);
    let app = chart_entry(&json, "app");
    assert_eq!(app["dependencies"], serde_json::json!([]));
    assert_eq!(app["skipped"][0]["reason"], "extraction-failed");
}

#[test]
fn test_missing_vendored_chart_is_skipped() {
    let ws = ChartWorkspace::new();
    ws.chart(
        "app",
        ChartFixture::new("app", "1.0.0").dependency(ChartDependency::new("redis", "17.0.0", "")),
    );

    let json = deps_json(&ws, &[]);
    let app = chart_entry(&json, "app");
    assert_eq!(app["dependencies"], serde_json::json!([]));
    assert_eq!(app["skipped"][0]["reason"], "not-found");
}

fn cyclic_workspace() -> ChartWorkspace {
    let ws = ChartWorkspace::new();
    ws.chart(
        "a",
        ChartFixture::new("a", "1.0.0").dependency(ChartDependency::new("b", "1.0.0", "file://../b")),
    );
    ws.chart(
        "b",
        ChartFixture::new("b", "1.0.0").dependency(ChartDependency::new("a", "1.0.0", "file://../a")),
    );
    ws
}

#[test]
fn test_cycle_fails_by_default() {
    let ws = cyclic_workspace();

    ws.helmdoc(&["deps"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Circular dependency detected"))
        .stderr(predicate::str::contains("--on-cycle skip"));
}

#[test]
fn test_cycle_can_be_skipped() {
    let ws = cyclic_workspace();

    let json = deps_json(&ws, &["--on-cycle", "skip"]);
    let a = chart_entry(&json, "a");
    assert_eq!(a["dependencies"][0]["prefix"], "b");
    assert_eq!(a["dependencies"][0]["dependencies"], serde_json::json!([]));
    assert_eq!(a["skipped"][0]["reason"], "cycle");
}

#[test]
fn test_invalid_format_is_rejected() {
    let ws = standard_workspace();

    ws.helmdoc(&["deps", "--format", "yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid format 'yaml'"));
}

#[test]
fn test_empty_search_root() {
    let ws = ChartWorkspace::new();

    ws.helmdoc(&["deps"]).assert().success().stdout(predicate::str::contains("No charts found"));
    ws.helmdoc(&["deps", "--format", "json"]).assert().success().stdout("[]\n");
}

#[test]
fn test_chart_flag_requires_a_chart() {
    let ws = ChartWorkspace::new();
    std::fs::create_dir_all(ws.path("empty")).unwrap();
    let empty = ws.path("empty");

    ws.helmdoc(&["deps", "--chart", empty.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No Chart.yaml found"));
}

#[test]
fn test_unquoted_version_finds_matching_archive() {
    let ws = ChartWorkspace::new();
    ws.write(
        "app/Chart.yaml",
        "apiVersion: v2\nname: app\nversion: 1.0.0\ndependencies:\n  - name: redis\n    version: 1.10\n    repository: https://charts.example.com\n",
    );
    ws.archive("app/charts", ChartFixture::new("redis", "1.10"));
    assert!(ws.path("app/charts/redis-1.10.tgz").exists());

    let json = deps_json(&ws, &[]);
    let app = chart_entry(&json, "app");
    assert_eq!(app["dependencies"][0]["chart"], "redis");
    assert_eq!(app["skipped"], serde_json::json!([]));
}

#[test]
fn test_cyclic_chart_does_not_hide_other_charts() {
    let ws = cyclic_workspace();
    ws.chart("zeta", ChartFixture::new("zeta", "1.0.0"));

    let output = ws.helmdoc(&["deps", "--format", "json"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 1);
    chart_entry(&json, "zeta");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Circular dependency detected"));
    assert!(stderr.contains("Failed to resolve 2 of 3 charts"));
}
