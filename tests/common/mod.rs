//! Common helpers for helmdoc integration tests

// Not every helper is used by every test module
#![allow(dead_code)]

use assert_cmd::Command;
use helmdoc::chart::ChartDependency;
use helmdoc::test_utils::ChartFixture;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary chart search root.
pub struct ChartWorkspace {
    _temp_dir: TempDir, // Keep alive for RAII cleanup
    root: PathBuf,
}

impl ChartWorkspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("charts");
        std::fs::create_dir_all(&root).unwrap();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Write `fixture` to `<root>/<relative>`.
    pub fn chart(&self, relative: &str, fixture: ChartFixture) -> PathBuf {
        fixture.write(&self.path(relative)).unwrap()
    }

    /// Package `fixture` into `<root>/<relative>/<name>-<version>.tgz`.
    pub fn archive(&self, relative: &str, fixture: ChartFixture) -> PathBuf {
        fixture.write_archive(&self.path(relative)).unwrap()
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    /// `helmdoc <args..> <root>`.
    pub fn helmdoc(&self, args: &[&str]) -> Command {
        let mut cmd = helmdoc_cmd();
        cmd.args(args).arg(&self.root);
        cmd
    }
}

/// The binary, without colors or ambient configuration.
pub fn helmdoc_cmd() -> Command {
    let mut cmd = Command::cargo_bin("helmdoc").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("HELMDOC_CONFIG").env_remove("RUST_LOG");
    cmd
}

/// `app` with a vendored `redis` (which vendors `metrics`), a `file://`
/// `common` aliased as `shared`, and a packaged `postgresql` aliased as `db`.
pub fn standard_workspace() -> ChartWorkspace {
    let ws = ChartWorkspace::new();

    ws.chart(
        "app",
        ChartFixture::new("app", "1.0.0")
            .values("# -- Number of pods\nreplicas: 1\n")
            .dependency(ChartDependency::new("redis", "17.0.0", ""))
            .dependency(ChartDependency::new("common", "0.1.0", "file://../common").with_alias("shared"))
            .dependency(
                ChartDependency::new("postgresql", "12.1.0", "https://charts.bitnami.com/bitnami")
                    .with_alias("db"),
            ),
    );
    ws.chart(
        "app/charts/redis",
        ChartFixture::new("redis", "17.0.0")
            .values("# -- Redis port\nport: 6379\n")
            .dependency(ChartDependency::new("metrics", "1.0.0", "")),
    );
    ws.chart(
        "app/charts/redis/charts/metrics",
        ChartFixture::new("metrics", "1.0.0").values("enabled: false\n"),
    );
    ws.chart("common", ChartFixture::new("common", "0.1.0").values("labels: {}\n"));
    ws.archive(
        "app/charts",
        ChartFixture::new("postgresql", "12.1.0").values("# -- (int) Database port\nport: 5432\n"),
    );

    ws
}

/// Find the report for chart `name` in a JSON array of per-chart reports.
pub fn chart_entry<'a>(json: &'a serde_json::Value, name: &str) -> &'a serde_json::Value {
    json.as_array()
        .unwrap()
        .iter()
        .find(|entry| entry["chart"] == name)
        .unwrap_or_else(|| panic!("no report for chart {name} in {json}"))
}
