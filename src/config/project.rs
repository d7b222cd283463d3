//! The `helmdoc.toml` configuration file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::chart::ParsingConfig;
use crate::chart::parser::DEFAULT_VALUES_FILE;
use crate::core::HelmdocError;
use crate::dependency::CyclePolicy;

/// File name looked up in the chart search root.
pub const CONFIG_FILE_NAME: &str = "helmdoc.toml";

/// Settings loaded from `helmdoc.toml`.
///
/// Every field is optional; an empty file is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HelmdocConfig {
    /// Values file name read from each chart directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values_file: Option<String>,

    /// Glob patterns of directories to leave out of chart discovery.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,

    /// How dependency cycles are handled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_cycle: Option<CyclePolicy>,
}

impl HelmdocConfig {
    /// Load the configuration for a run rooted at `search_root`.
    ///
    /// An `explicit` path must exist. Without one, `<search_root>/helmdoc.toml`
    /// is used when present and defaults otherwise. Returns the configuration
    /// together with the file it came from.
    pub async fn load(explicit: Option<&Path>, search_root: &Path) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            if !fs::try_exists(path).await.unwrap_or(false) {
                return Err(HelmdocError::ConfigError {
                    message: format!("Config file not found: {}", path.display()),
                }
                .into());
            }
            let config = Self::load_from(path).await?;
            return Ok((config, Some(path.to_path_buf())));
        }

        let default_path = search_root.join(CONFIG_FILE_NAME);
        if fs::try_exists(&default_path).await.unwrap_or(false) {
            let config = Self::load_from(&default_path).await?;
            return Ok((config, Some(default_path)));
        }

        Ok((Self::default(), None))
    }

    /// Read and parse one configuration file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Layer command-line values over the file values.
    ///
    /// `values_file` and `on_cycle` replace the configured value when given;
    /// `ignore` patterns are appended.
    pub fn apply_overrides(
        &mut self,
        values_file: Option<String>,
        ignore: &[String],
        on_cycle: Option<CyclePolicy>,
    ) {
        if values_file.is_some() {
            self.values_file = values_file;
        }
        self.ignore.extend(ignore.iter().cloned());
        if on_cycle.is_some() {
            self.on_cycle = on_cycle;
        }
    }

    /// Chart parsing settings derived from this configuration.
    #[must_use]
    pub fn parsing_config(&self) -> ParsingConfig {
        ParsingConfig {
            values_file: self.values_file.clone().unwrap_or_else(|| DEFAULT_VALUES_FILE.to_string()),
        }
    }

    /// Effective cycle policy.
    #[must_use]
    pub fn cycle_policy(&self) -> CyclePolicy {
        self.on_cycle.unwrap_or_default()
    }
}
