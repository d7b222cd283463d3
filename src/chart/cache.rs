//! Path-keyed store of parsed charts.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::ChartInfo;
use crate::utils::normalize_path;

/// Parsed [`ChartInfo`] keyed by chart directory.
///
/// Keys are normalized lexically (see [`normalize_path`]) on insert and on
/// lookup, so `app/charts/../common` and `app/common` name the same entry.
/// The cache is seeded with every discovered chart before resolution and
/// grows when the resolver unpacks archived sub-charts; entries are never
/// removed.
#[derive(Debug, Clone, Default)]
pub struct ChartInfoCache {
    entries: HashMap<PathBuf, ChartInfo>,
}

impl ChartInfoCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `chart_directory`.
    pub fn insert(&mut self, chart_directory: impl AsRef<Path>, info: ChartInfo) {
        self.entries.insert(normalize_path(chart_directory.as_ref()), info);
    }

    /// Insert an entry only if the key is not present yet.
    ///
    /// Returns `true` if the entry was inserted.
    pub fn insert_if_absent(&mut self, chart_directory: impl AsRef<Path>, info: ChartInfo) -> bool {
        let key = normalize_path(chart_directory.as_ref());
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, info);
        true
    }

    /// Look up a chart by directory.
    #[must_use]
    pub fn get(&self, chart_directory: &Path) -> Option<&ChartInfo> {
        self.entries.get(&normalize_path(chart_directory))
    }

    /// Whether a chart directory is cached.
    #[must_use]
    pub fn contains(&self, chart_directory: &Path) -> bool {
        self.entries.contains_key(&normalize_path(chart_directory))
    }

    /// Number of cached charts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached chart directories, sorted.
    #[must_use]
    pub fn directories(&self) -> Vec<&Path> {
        let mut dirs: Vec<&Path> = self.entries.keys().map(PathBuf::as_path).collect();
        dirs.sort();
        dirs
    }
}

impl FromIterator<ChartInfo> for ChartInfoCache {
    fn from_iter<I: IntoIterator<Item = ChartInfo>>(iter: I) -> Self {
        let mut cache = Self::new();
        for info in iter {
            let dir = info.chart_directory.clone();
            cache.insert(dir, info);
        }
        cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartMetadata;

    fn chart(dir: &str, name: &str) -> ChartInfo {
        ChartInfo::new(
            dir,
            ChartMetadata {
                name: name.to_string(),
                ..Default::default()
            },
            serde_yaml::Value::Null,
            Default::default(),
        )
    }

    #[test]
    fn test_lookup_is_normalized() {
        let mut cache = ChartInfoCache::new();
        cache.insert("app/common", chart("app/common", "common"));

        assert!(cache.contains(Path::new("app/charts/../common")));
        assert!(cache.contains(Path::new("./app/common")));
        assert_eq!(cache.get(Path::new("app/./common")).unwrap().name(), "common");
    }

    #[test]
    fn test_insert_if_absent_keeps_existing() {
        let mut cache = ChartInfoCache::new();
        cache.insert("app", chart("app", "original"));

        assert!(!cache.insert_if_absent("app", chart("app", "replacement")));
        assert_eq!(cache.get(Path::new("app")).unwrap().name(), "original");

        assert!(cache.insert_if_absent("other", chart("other", "other")));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_from_iterator_keys_by_directory() {
        let cache: ChartInfoCache = vec![chart("b", "b"), chart("a", "a")].into_iter().collect();
        assert_eq!(cache.directories(), vec![Path::new("a"), Path::new("b")]);
    }
}
