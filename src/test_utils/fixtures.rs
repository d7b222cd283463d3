//! On-disk chart fixtures.

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs;
use std::path::{Path, PathBuf};

use crate::chart::{CHART_FILE, ChartDependency, ChartMetadata};

/// Builder for a chart written either as a directory or as a packaged archive.
#[derive(Clone, Debug)]
pub struct ChartFixture {
    pub name: String,
    pub version: String,
    pub dependencies: Vec<ChartDependency>,
    pub values: Option<String>,
    /// Extra files, relative to the chart directory.
    pub files: Vec<(String, String)>,
    /// Top-level directory inside the archive; defaults to the chart name.
    pub archive_root: Option<String>,
}

impl ChartFixture {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            dependencies: Vec::new(),
            values: None,
            files: Vec::new(),
            archive_root: None,
        }
    }

    /// Contents of `values.yaml`. Without it no values file is written.
    pub fn values(mut self, content: impl Into<String>) -> Self {
        self.values = Some(content.into());
        self
    }

    pub fn dependency(mut self, dependency: ChartDependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.push((path.into(), content.into()));
        self
    }

    pub fn archive_root(mut self, root: impl Into<String>) -> Self {
        self.archive_root = Some(root.into());
        self
    }

    /// Rendered `Chart.yaml`.
    pub fn chart_yaml(&self) -> Result<String> {
        let metadata = ChartMetadata {
            api_version: Some("v2".to_string()),
            name: self.name.clone(),
            version: self.version.clone(),
            dependencies: self.dependencies.clone(),
            ..Default::default()
        };
        serde_yaml::to_string(&metadata).context("Failed to render Chart.yaml")
    }

    fn entries(&self) -> Result<Vec<(String, String)>> {
        let mut entries = vec![(CHART_FILE.to_string(), self.chart_yaml()?)];
        if let Some(values) = &self.values {
            entries.push(("values.yaml".to_string(), values.clone()));
        }
        entries.extend(self.files.iter().cloned());
        Ok(entries)
    }

    /// Write the chart into `dir`, creating it if needed.
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        for (relative, content) in self.entries()? {
            let path = dir.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(&path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        Ok(dir.to_path_buf())
    }

    /// Package the chart as `<dir>/<name>-<version>.tgz`, the way
    /// `helm dependency update` stores remote dependencies.
    pub fn write_archive(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
        let archive = dir.join(format!("{}-{}.tgz", self.name, self.version));
        let root = self.archive_root.as_deref().unwrap_or(&self.name);

        let file = fs::File::create(&archive)
            .with_context(|| format!("Failed to create {}", archive.display()))?;
        let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));

        for (relative, content) in self.entries()? {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, format!("{root}/{relative}"), content.as_bytes())
                .with_context(|| format!("Failed to add {relative} to archive"))?;
        }

        builder.into_inner()?.finish()?;
        Ok(archive)
    }
}
