//! helmdoc - Helm sub-chart dependency resolution and values documentation
//!
//! A Helm chart's `values.yaml` only tells half the story: every sub-chart it
//! depends on contributes values of its own, set in the parent chart under the
//! sub-chart's name or alias. helmdoc walks a chart's dependency tree and
//! collects the values tree of every reachable sub-chart, tagged with the
//! dotted prefix it lives under.
//!
//! # Dependency Sources
//!
//! Each entry of a chart's `dependencies` list is located by its `repository`:
//!
//! - `file://<path>` - a vendored chart at `<path>`, relative to the parent
//! - empty - an extracted chart under `charts/<name>`
//! - anything else - a remote chart, used only when `helm dependency update`
//!   left a `charts/<name>-<version>.tgz` archive behind
//!
//! Dependencies that cannot be located are skipped with a warning; they never
//! fail the run.
//!
//! # Core Modules
//!
//! - [`chart`] - Chart parsing, discovery and the path-keyed [`chart::ChartInfoCache`]
//! - [`dependency`] - The locator and the recursive [`dependency::DependencyResolver`]
//! - [`values`] - Flattening resolved values into documented rows
//!
//! ## Supporting Modules
//!
//! - [`cli`] - The `helmdoc` command-line interface
//! - [`config`] - Optional `helmdoc.toml` configuration
//! - [`core`] - Error types and user-facing error formatting
//! - [`utils`] - Path normalization
//!
//! # Example
//!
//! ```rust,no_run
//! use helmdoc::chart::{FsChartLoader, ParsingConfig, find_chart_directories, seed_cache};
//! use helmdoc::dependency::DependencyResolver;
//! use helmdoc::values::flatten;
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let loader = FsChartLoader::new(ParsingConfig::default());
//! let directories = find_chart_directories(Path::new("charts"), &[])?;
//! let mut cache = seed_cache(&directories, &loader);
//!
//! for dir in &directories {
//!     let Some(root) = cache.get(dir).cloned() else { continue };
//!     let resolution = DependencyResolver::new(&mut cache, &loader).resolve(&root)?;
//!     for row in flatten(&root, &resolution.values) {
//!         println!("{} = {}", row.key, row.default);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod chart;
pub mod cli;
pub mod config;
pub mod core;
pub mod dependency;
pub mod utils;
pub mod values;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
