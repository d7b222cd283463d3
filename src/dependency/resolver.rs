//! Recursive dependency resolver.
//!
//! Walks a chart's dependency tree depth-first in pre-order: every
//! dependency's own entry precedes the entries of its descendants, and
//! siblings keep their declaration order. Each entry is tagged with the dotted
//! prefix its values live under, built from the alias (or name) of every
//! ancestor dependency.
//!
//! ```text
//! app
//! ├── backend          → "backend"
//! │   └── db (alias)   → "backend.db"
//! └── redis            → "redis"
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use super::locator::{Located, Locator};
use super::scratch::ScratchSpace;
use super::{SkipReason, SkippedDependency};
use crate::chart::{ChartDependency, ChartInfo, ChartInfoCache, ChartLoader, ValueDescriptions};
use crate::core::HelmdocError;
use crate::utils::normalize_path;

/// What to do when a dependency resolves to a chart already on the current
/// dependency chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CyclePolicy {
    /// Abort resolution with [`HelmdocError::CircularDependency`].
    #[default]
    Error,
    /// Log a warning, record the dependency as skipped and continue.
    Skip,
}

impl fmt::Display for CyclePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

impl FromStr for CyclePolicy {
    type Err = HelmdocError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "skip" => Ok(Self::Skip),
            other => Err(HelmdocError::ConfigError {
                message: format!("Invalid cycle policy '{other}'. Valid values are: error, skip"),
            }),
        }
    }
}

/// Values of one resolved sub-chart.
#[derive(Debug, Clone)]
pub struct DependencyValues {
    /// Dotted namespace of the sub-chart's values in the root chart, e.g. `backend.db`.
    pub prefix: String,
    /// The sub-chart's values tree, shared with its cache entry.
    pub values: Arc<serde_yaml::Value>,
    /// Descriptions of the sub-chart's values, keyed by path within the sub-chart.
    pub descriptions: Arc<ValueDescriptions>,
    /// Directory the sub-chart was resolved to.
    pub chart_directory: PathBuf,
    /// Chart name from the sub-chart's `Chart.yaml`.
    pub chart_name: String,
    /// Nesting level below the root chart; direct dependencies are `0`.
    pub depth: usize,
}

/// Result of resolving one root chart.
#[derive(Debug)]
pub struct Resolution {
    /// Resolved sub-charts in depth-first pre-order.
    pub values: Vec<DependencyValues>,
    /// Dependencies left out, in the order they were encountered.
    pub skipped: Vec<SkippedDependency>,
    /// Directories holding unpacked archives. Keep alive while the resolved
    /// chart directories are still needed; dropping it removes them.
    pub scratch: ScratchSpace,
}

/// Mutable state of one top-level walk.
#[derive(Default)]
struct Walk {
    scratch: ScratchSpace,
    skipped: Vec<SkippedDependency>,
    /// Chart directories on the active dependency chain, root first.
    chain: Vec<PathBuf>,
}

impl Walk {
    fn skip(&mut self, chart: &ChartInfo, dependency: &ChartDependency, reason: SkipReason) {
        self.skipped.push(SkippedDependency {
            chart_directory: chart.directory().to_path_buf(),
            dependency: dependency.clone(),
            reason,
        });
    }

    fn describe_cycle(&self, repeated: &Path) -> String {
        let start = self.chain.iter().position(|dir| dir == repeated).unwrap_or(0);
        self.chain[start..]
            .iter()
            .map(|dir| dir.as_path())
            .chain(std::iter::once(repeated))
            .map(|dir| dir.display().to_string())
            .collect::<Vec<_>>()
            .join(" → ")
    }
}

/// Resolves the dependency tree of a chart against a [`ChartInfoCache`].
///
/// # Examples
///
/// ```rust,no_run
/// use helmdoc::chart::{FsChartLoader, ParsingConfig, find_chart_directories, seed_cache};
/// use helmdoc::dependency::DependencyResolver;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let loader = FsChartLoader::new(ParsingConfig::default());
/// let dirs = find_chart_directories(Path::new("charts"), &[])?;
/// let mut cache = seed_cache(&dirs, &loader);
///
/// let root = cache.get(Path::new("charts/app")).cloned().expect("app chart");
/// let resolution = DependencyResolver::new(&mut cache, &loader).resolve(&root)?;
/// for dep in &resolution.values {
///     println!("{} <- {}", dep.prefix, dep.chart_directory.display());
/// }
/// # Ok(())
/// # }
/// ```
pub struct DependencyResolver<'a> {
    cache: &'a mut ChartInfoCache,
    locator: Locator<'a>,
    cycle_policy: CyclePolicy,
}

impl<'a> DependencyResolver<'a> {
    /// Create a resolver over `cache`, parsing unpacked archives with `loader`.
    pub fn new(cache: &'a mut ChartInfoCache, loader: &'a dyn ChartLoader) -> Self {
        Self {
            cache,
            locator: Locator::new(loader),
            cycle_policy: CyclePolicy::default(),
        }
    }

    /// Set how dependency cycles are handled.
    #[must_use]
    pub fn with_cycle_policy(mut self, cycle_policy: CyclePolicy) -> Self {
        self.cycle_policy = cycle_policy;
        self
    }

    /// Resolve every sub-chart reachable from `root`.
    ///
    /// Unresolvable dependencies are skipped and reported in
    /// [`Resolution::skipped`]. On error, every scratch directory created
    /// so far is removed before returning.
    ///
    /// # Errors
    ///
    /// [`HelmdocError::CircularDependency`] when a cycle is found under
    /// [`CyclePolicy::Error`].
    pub fn resolve(&mut self, root: &ChartInfo) -> Result<Resolution> {
        let mut walk = Walk {
            chain: vec![normalize_path(root.directory())],
            ..Walk::default()
        };

        let values = self.resolve_with_prefix(root, "", &mut walk)?;

        tracing::debug!(
            "Resolved {} dependencies for {} ({} skipped)",
            values.len(),
            root.directory().display(),
            walk.skipped.len()
        );

        Ok(Resolution {
            values,
            skipped: walk.skipped,
            scratch: walk.scratch,
        })
    }

    fn resolve_with_prefix(
        &mut self,
        chart: &ChartInfo,
        prefix: &str,
        walk: &mut Walk,
    ) -> Result<Vec<DependencyValues>> {
        if chart.dependencies().is_empty() {
            return Ok(Vec::new());
        }

        let mut result = Vec::with_capacity(chart.dependencies().len());

        for dependency in chart.dependencies() {
            let search_path = match self.locator.resolve_search_path(
                chart.directory(),
                dependency,
                self.cache,
                &mut walk.scratch,
            ) {
                Located::Found(path) => path,
                Located::Skipped(reason) => {
                    walk.skip(chart, dependency, reason);
                    continue;
                }
            };

            let Some(info) = self.cache.get(&search_path).cloned() else {
                tracing::warn!(
                    "Dependency with path {} was not found. Dependency values will not be included.",
                    search_path.display()
                );
                walk.skip(chart, dependency, SkipReason::NotFound {
                    search_path,
                });
                continue;
            };

            let key = normalize_path(&search_path);
            if walk.chain.contains(&key) {
                let chain = walk.describe_cycle(&key);
                match self.cycle_policy {
                    CyclePolicy::Error => {
                        return Err(HelmdocError::CircularDependency {
                            chain,
                        }
                        .into());
                    }
                    CyclePolicy::Skip => {
                        tracing::warn!(
                            "Dependency '{}' of {} is circular ({}). Dependency values will not be included.",
                            dependency.namespace(),
                            chart.directory().display(),
                            chain
                        );
                        walk.skip(chart, dependency, SkipReason::Cycle {
                            search_path,
                        });
                        continue;
                    }
                }
            }

            let dep_prefix = format!("{prefix}{}", dependency.namespace());

            result.push(DependencyValues {
                prefix: dep_prefix.clone(),
                values: Arc::clone(&info.values),
                descriptions: Arc::clone(&info.descriptions),
                chart_directory: search_path,
                chart_name: info.name().to_string(),
                depth: walk.chain.len() - 1,
            });

            walk.chain.push(key);
            let children = self.resolve_with_prefix(&info, &format!("{dep_prefix}."), walk)?;
            walk.chain.pop();

            result.extend(children);
        }

        Ok(result)
    }
}
