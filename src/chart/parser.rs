//! Chart directory parsing.
//!
//! Reads the three files that make up what helmdoc knows about a chart:
//!
//! - `Chart.yaml` (required) for the name, version and dependency list
//! - `requirements.yaml` (optional) for apiVersion v1 charts that declare
//!   dependencies there instead of in `Chart.yaml`
//! - the values file (optional, `values.yaml` by default) for the values tree
//!   and the comment-based value descriptions

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

use super::descriptions::parse_value_descriptions;
use super::{CHART_FILE, ChartDependency, ChartInfo, ChartMetadata, REQUIREMENTS_FILE};
use crate::core::{FileOperation, FileResultExt, HelmdocError};

/// Default name of the values file inside a chart directory.
pub const DEFAULT_VALUES_FILE: &str = "values.yaml";

/// Options controlling how a chart directory is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsingConfig {
    /// Values file name, relative to the chart directory.
    pub values_file: String,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            values_file: DEFAULT_VALUES_FILE.to_string(),
        }
    }
}

/// Loads [`ChartInfo`] for a chart directory.
///
/// The dependency resolver only talks to this trait, so callers can swap the
/// filesystem parser for an in-memory one.
pub trait ChartLoader {
    /// Parse the chart stored in `chart_directory`.
    fn load(&self, chart_directory: &Path) -> Result<ChartInfo>;
}

/// [`ChartLoader`] reading charts from disk with [`parse_chart_information`].
#[derive(Debug, Clone, Default)]
pub struct FsChartLoader {
    config: ParsingConfig,
}

impl FsChartLoader {
    /// Create a loader using the given parsing options.
    #[must_use]
    pub const fn new(config: ParsingConfig) -> Self {
        Self {
            config,
        }
    }

    /// The parsing options in use.
    #[must_use]
    pub const fn config(&self) -> &ParsingConfig {
        &self.config
    }
}

impl ChartLoader for FsChartLoader {
    fn load(&self, chart_directory: &Path) -> Result<ChartInfo> {
        parse_chart_information(chart_directory, &self.config)
    }
}

#[derive(Debug, Default, Deserialize)]
struct Requirements {
    #[serde(default)]
    dependencies: Vec<ChartDependency>,
}

/// Parse a chart directory into [`ChartInfo`].
///
/// # Errors
///
/// - [`HelmdocError::ChartNotFound`] if the directory has no `Chart.yaml`
/// - [`HelmdocError::ChartParseError`] if `Chart.yaml` or `requirements.yaml` is invalid
/// - [`HelmdocError::ValuesParseError`] if the values file is not valid YAML
/// - a file operation error if any of the files cannot be read
pub fn parse_chart_information(chart_directory: &Path, config: &ParsingConfig) -> Result<ChartInfo> {
    let chart_file = chart_directory.join(CHART_FILE);
    if !chart_file.is_file() {
        return Err(HelmdocError::ChartNotFound {
            path: chart_directory.display().to_string(),
        }
        .into());
    }

    let chart_content = std::fs::read_to_string(&chart_file).with_file_context(
        FileOperation::Read,
        &chart_file,
        "loading chart metadata",
        "chart::parser",
    )?;

    let mut metadata: ChartMetadata =
        serde_yaml::from_str(&chart_content).map_err(|e| HelmdocError::ChartParseError {
            file: chart_file.display().to_string(),
            reason: e.to_string(),
        })?;

    if metadata.dependencies.is_empty() {
        metadata.dependencies = read_requirements(chart_directory)?;
    }

    let values_file = chart_directory.join(&config.values_file);
    let (values, descriptions) = if values_file.is_file() {
        let content = std::fs::read_to_string(&values_file).with_file_context(
            FileOperation::Read,
            &values_file,
            "loading chart values",
            "chart::parser",
        )?;

        let values = parse_values(&content).map_err(|e| HelmdocError::ValuesParseError {
            file: values_file.display().to_string(),
            reason: e.to_string(),
        })?;

        (values, parse_value_descriptions(&content))
    } else {
        tracing::debug!("Chart {} has no {}", chart_directory.display(), config.values_file);
        (empty_mapping(), Default::default())
    };

    tracing::debug!(
        "Parsed chart '{}' from {} ({} dependencies, {} described values)",
        metadata.name,
        chart_directory.display(),
        metadata.dependencies.len(),
        descriptions.len()
    );

    Ok(ChartInfo::new(chart_directory, metadata, values, descriptions))
}

fn read_requirements(chart_directory: &Path) -> Result<Vec<ChartDependency>> {
    let requirements_file = chart_directory.join(REQUIREMENTS_FILE);
    if !requirements_file.is_file() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(&requirements_file).with_file_context(
        FileOperation::Read,
        &requirements_file,
        "loading legacy chart requirements",
        "chart::parser",
    )?;

    let requirements: Option<Requirements> =
        serde_yaml::from_str(&content).map_err(|e| HelmdocError::ChartParseError {
            file: requirements_file.display().to_string(),
            reason: e.to_string(),
        })?;

    Ok(requirements.unwrap_or_default().dependencies)
}

/// An empty or comment-only values file is an empty mapping, not `null`.
fn parse_values(content: &str) -> std::result::Result<serde_yaml::Value, serde_yaml::Error> {
    match serde_yaml::from_str::<serde_yaml::Value>(content)? {
        serde_yaml::Value::Null => Ok(empty_mapping()),
        value => Ok(value),
    }
}

fn empty_mapping() -> serde_yaml::Value {
    serde_yaml::Value::Mapping(serde_yaml::Mapping::new())
}
