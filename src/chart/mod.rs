//! Parsed Helm chart information.
//!
//! A [`ChartInfo`] is everything the dependency resolver needs to know about a
//! single chart directory: its metadata (including declared dependencies), its
//! values tree and the descriptions attached to individual value paths.
//!
//! # Modules
//!
//! - [`parser`] - Reads `Chart.yaml`, `requirements.yaml` and the values file
//! - [`descriptions`] - Extracts `# -- ...` value descriptions from comments
//! - [`discovery`] - Finds chart directories below a search root
//! - [`cache`] - [`ChartInfoCache`], the path-keyed store of parsed charts

pub mod cache;
pub mod descriptions;
pub mod discovery;
pub mod parser;

pub use cache::ChartInfoCache;
pub use discovery::{find_chart_directories, seed_cache};
pub use parser::{ChartLoader, FsChartLoader, ParsingConfig, parse_chart_information};

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Scheme prefix marking a dependency vendored at a path relative to its parent.
pub const FILE_REPOSITORY_SCHEME: &str = "file://";

/// Name of the chart metadata file.
pub const CHART_FILE: &str = "Chart.yaml";

/// Legacy (apiVersion v1) dependency declaration file.
pub const REQUIREMENTS_FILE: &str = "requirements.yaml";

/// Directory holding vendored sub-charts and packaged archives.
pub const CHARTS_DIR: &str = "charts";

/// One entry of a chart's `dependencies` list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartDependency {
    /// Chart name of the dependency.
    pub name: String,
    /// Version (or constraint) of the dependency.
    #[serde(default, deserialize_with = "scalar_string")]
    pub version: String,
    /// Where the dependency comes from.
    ///
    /// - `file://<path>`: vendored source relative to the parent chart
    /// - empty: already extracted under `charts/<name>`
    /// - anything else: remote repository, expected as `charts/<name>-<version>.tgz`
    #[serde(default)]
    pub repository: String,
    /// Name overriding [`name`](Self::name) for values namespacing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl ChartDependency {
    /// Creates a dependency with just a name, version and repository.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        repository: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            repository: repository.into(),
            alias: None,
        }
    }

    /// Sets the alias.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// The namespace segment this dependency's values live under: its alias
    /// when one is set and non-empty, otherwise its name.
    #[must_use]
    pub fn namespace(&self) -> &str {
        match self.alias.as_deref() {
            Some(alias) if !alias.is_empty() => alias,
            _ => &self.name,
        }
    }
}

/// The subset of `Chart.yaml` helmdoc reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMetadata {
    /// Chart API version (`v1` or `v2`).
    #[serde(default)]
    pub api_version: Option<String>,
    /// Chart name.
    pub name: String,
    /// Chart version.
    #[serde(default, deserialize_with = "scalar_string")]
    pub version: String,
    /// Version of the packaged application.
    #[serde(
        default,
        deserialize_with = "optional_scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub app_version: Option<String>,
    /// One-line chart description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared sub-charts, in declaration order.
    #[serde(default)]
    pub dependencies: Vec<ChartDependency>,
}

/// Description attached to a single value path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValueDescription {
    /// Free-form description text.
    pub description: String,
    /// Override for the rendered default (`# @default -- ...`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Explicit type annotation (`# -- (type) ...`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
}

/// Map from dotted value path to its description.
pub type ValueDescriptions = BTreeMap<String, ValueDescription>;

/// Everything known about one parsed chart directory.
///
/// The values tree and description map are reference counted: resolved
/// dependency entries share them with the cache instead of copying.
#[derive(Debug, Clone)]
pub struct ChartInfo {
    /// Directory the chart was parsed from.
    pub chart_directory: PathBuf,
    /// Parsed `Chart.yaml`.
    pub metadata: ChartMetadata,
    /// Parsed values file (an empty mapping when the chart has none).
    pub values: Arc<serde_yaml::Value>,
    /// Descriptions extracted from the values file comments.
    pub descriptions: Arc<ValueDescriptions>,
}

impl ChartInfo {
    /// Builds chart info from its parts.
    pub fn new(
        chart_directory: impl Into<PathBuf>,
        metadata: ChartMetadata,
        values: serde_yaml::Value,
        descriptions: ValueDescriptions,
    ) -> Self {
        Self {
            chart_directory: chart_directory.into(),
            metadata,
            values: Arc::new(values),
            descriptions: Arc::new(descriptions),
        }
    }

    /// Declared dependencies, in declaration order.
    #[must_use]
    pub fn dependencies(&self) -> &[ChartDependency] {
        &self.metadata.dependencies
    }

    /// Directory of the chart.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.chart_directory
    }

    /// Chart name from `Chart.yaml`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }
}

/// Accepts any YAML scalar where a string is expected, keeping its source
/// text: `version: 1.10` is a float to a YAML parser but the version string
/// `1.10` to Helm.
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_str(ScalarStringVisitor)
}

struct ScalarStringVisitor;

impl Visitor<'_> for ScalarStringVisitor {
    type Value = String;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a scalar")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<String, E> {
        // Plain null tokens; a quoted "null" is indistinguishable here.
        match value {
            "~" | "null" | "Null" | "NULL" => Ok(String::new()),
            _ => Ok(value.to_string()),
        }
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<String, E> {
        self.visit_str(&value)
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<String, E> {
        Ok(value.to_string())
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<String, E> {
        Ok(value.to_string())
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<String, E> {
        Ok(value.to_string())
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<String, E> {
        Ok(value.to_string())
    }

    fn visit_unit<E: de::Error>(self) -> Result<String, E> {
        Ok(String::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<String, E> {
        Ok(String::new())
    }
}

fn optional_scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = scalar_string(deserializer)?;
    Ok((!value.is_empty()).then_some(value))
}
