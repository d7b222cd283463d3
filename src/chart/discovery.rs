//! Chart directory discovery.
//!
//! Walks a search root for directories containing a `Chart.yaml` and seeds a
//! [`ChartInfoCache`] with every chart that parses. Vendored sub-charts under
//! `charts/<name>` are ordinary chart directories and are discovered the same
//! way, which is what lets the resolver find them by path later.

use anyhow::{Context, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use super::{CHART_FILE, ChartInfoCache, ChartLoader};
use crate::utils::normalize_path;

/// Compile ignore globs, rejecting invalid patterns.
pub fn compile_ignore_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p.as_ref()).with_context(|| format!("Invalid ignore pattern '{}'", p.as_ref()))
        })
        .collect()
}

/// Find every chart directory below `root`, sorted.
///
/// Hidden directories (`.git`, `.github`, ...) are never entered. A directory
/// is skipped together with everything below it when its path relative to
/// `root`, or its bare name, matches one of `ignore`.
pub fn find_chart_directories(root: &Path, ignore: &[Pattern]) -> Result<Vec<PathBuf>> {
    let mut charts = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry, root) && !is_ignored(entry, root, ignore));

    for entry in walker {
        let entry =
            entry.with_context(|| format!("Failed to walk chart search root {}", root.display()))?;

        if entry.file_type().is_file()
            && entry.file_name() == CHART_FILE
            && let Some(parent) = entry.path().parent()
        {
            charts.push(normalize_path(parent));
        }
    }

    charts.sort();
    tracing::debug!("Found {} chart(s) under {}", charts.len(), root.display());
    Ok(charts)
}

/// Parse every chart directory into a fresh cache.
///
/// Charts that fail to parse are logged and left out; a sibling chart that
/// depends on one of them will later be reported as not found.
pub fn seed_cache(chart_directories: &[PathBuf], loader: &dyn ChartLoader) -> ChartInfoCache {
    let mut cache = ChartInfoCache::new();

    for dir in chart_directories {
        match loader.load(dir) {
            Ok(info) => cache.insert(dir, info),
            Err(e) => {
                tracing::warn!("Error parsing information for chart {}, skipping: {:#}", dir.display(), e);
            }
        }
    }

    cache
}

fn is_hidden(entry: &DirEntry, root: &Path) -> bool {
    entry.path() != root
        && entry.file_type().is_dir()
        && entry.file_name().to_str().is_some_and(|name| name.starts_with('.'))
}

fn is_ignored(entry: &DirEntry, root: &Path, ignore: &[Pattern]) -> bool {
    if ignore.is_empty() || entry.path() == root {
        return false;
    }

    let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
    let name = entry.file_name().to_string_lossy();

    ignore.iter().any(|pattern| pattern.matches_path(relative) || pattern.matches(&name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{FsChartLoader, ParsingConfig};
    use std::fs;
    use tempfile::TempDir;

    fn chart(root: &Path, rel: &str) {
        let dir = root.join(rel);
        fs::create_dir_all(&dir).unwrap();
        let name = dir.file_name().unwrap().to_string_lossy().to_string();
        fs::write(dir.join(CHART_FILE), format!("name: {name}\nversion: 0.1.0\n")).unwrap();
    }

    #[test]
    fn test_finds_nested_charts() {
        let temp = TempDir::new().unwrap();
        chart(temp.path(), "web");
        chart(temp.path(), "web/charts/redis");
        chart(temp.path(), "api");
        fs::create_dir_all(temp.path().join("docs")).unwrap();

        let found = find_chart_directories(temp.path(), &[]).unwrap();
        let relative: Vec<PathBuf> =
            found.iter().map(|p| p.strip_prefix(temp.path()).unwrap().to_path_buf()).collect();

        assert_eq!(
            relative,
            vec![PathBuf::from("api"), PathBuf::from("web"), PathBuf::from("web/charts/redis")]
        );
    }

    #[test]
    fn test_skips_hidden_and_ignored_directories() {
        let temp = TempDir::new().unwrap();
        chart(temp.path(), "web");
        chart(temp.path(), ".cache/stale");
        chart(temp.path(), "testdata/broken");

        let ignore = compile_ignore_patterns(&["testdata"]).unwrap();
        let found = find_chart_directories(temp.path(), &ignore).unwrap();

        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("web"));
    }

    #[test]
    fn test_invalid_ignore_pattern() {
        assert!(compile_ignore_patterns(&["[unclosed"]).is_err());
    }

    #[test]
    fn test_seed_cache_skips_unparseable_charts() {
        let temp = TempDir::new().unwrap();
        chart(temp.path(), "good");
        let bad = temp.path().join("bad");
        fs::create_dir_all(&bad).unwrap();
        fs::write(bad.join(CHART_FILE), "name: [oops\n").unwrap();

        let dirs = find_chart_directories(temp.path(), &[]).unwrap();
        let loader = FsChartLoader::new(ParsingConfig::default());
        let cache = seed_cache(&dirs, &loader);

        assert_eq!(dirs.len(), 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&temp.path().join("good")));
    }
}
