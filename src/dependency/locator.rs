//! Dependency locator: declaration to chart directory.
//!
//! A dependency's `repository` field selects one of three mutually exclusive
//! strategies:
//!
//! | repository            | search path                                         |
//! |-----------------------|-----------------------------------------------------|
//! | `file://<path>`       | `<parent>/<path>`                                   |
//! | empty                 | `<parent>/charts/<name>`                            |
//! | anything else         | `<scratch>/<name>` unpacked from `<parent>/charts/<name>-<version>.tgz` |
//!
//! The locator never fails hard. Anything that prevents producing a search
//! path is returned as [`Located::Skipped`] with a [`SkipReason`].

use std::path::{Path, PathBuf};

use super::SkipReason;
use super::archive::unpack_chart;
use super::scratch::ScratchSpace;
use crate::chart::{CHARTS_DIR, ChartDependency, ChartInfoCache, ChartLoader, FILE_REPOSITORY_SCHEME};
use crate::utils::{join_normalized, normalize_path};

/// Outcome of locating one dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located {
    /// Directory to look the dependency up under in the cache.
    Found(PathBuf),
    /// The dependency cannot be located; skip it and its subtree.
    Skipped(SkipReason),
}

/// Resolves dependency declarations to chart directories.
pub struct Locator<'a> {
    loader: &'a dyn ChartLoader,
}

impl<'a> Locator<'a> {
    /// Create a locator that parses unpacked archives with `loader`.
    pub fn new(loader: &'a dyn ChartLoader) -> Self {
        Self {
            loader,
        }
    }

    /// Determine where `dependency`, declared by the chart in `parent_directory`, lives.
    ///
    /// `file://` and conventional sub-directory paths are returned without an
    /// existence check; the cache lookup that follows decides whether they
    /// resolve. Archive dependencies are unpacked into a directory owned by
    /// `scratch` and, when the unpacked chart parses, added to `cache` under
    /// the returned path. A parse failure leaves the cache untouched, so the
    /// caller sees the dependency as not found.
    pub fn resolve_search_path(
        &self,
        parent_directory: &Path,
        dependency: &ChartDependency,
        cache: &mut ChartInfoCache,
        scratch: &mut ScratchSpace,
    ) -> Located {
        if let Some(relative) = dependency.repository.strip_prefix(FILE_REPOSITORY_SCHEME) {
            return Located::Found(join_normalized(parent_directory, relative));
        }

        if dependency.repository.is_empty() {
            return Located::Found(join_normalized(
                parent_directory,
                Path::new(CHARTS_DIR).join(&dependency.name),
            ));
        }

        let archive = archive_path(parent_directory, dependency);
        tracing::info!("Checking for tgz file {}", archive.display());

        if !archive.is_file() {
            tracing::warn!(
                "Chart in {} has a remote dependency '{}'. Dependency values will not be included.",
                parent_directory.display(),
                dependency.name
            );
            return Located::Skipped(SkipReason::RemoteWithoutArchive {
                archive,
            });
        }

        let search_path = match unpack_chart(&archive, &dependency.name, scratch) {
            Ok(path) => normalize_path(&path),
            Err(e) => {
                tracing::warn!("Failed to untar and find dependencies in {}: {:#}", archive.display(), e);
                return Located::Skipped(SkipReason::ExtractionFailed {
                    archive,
                    error: format!("{e:#}"),
                });
            }
        };

        match self.loader.load(&search_path) {
            Ok(info) => {
                cache.insert_if_absent(&search_path, info);
            }
            Err(e) => {
                tracing::debug!("Unpacked chart at {} did not parse: {:#}", search_path.display(), e);
            }
        }

        Located::Found(search_path)
    }
}

/// Conventional location of a pre-fetched remote dependency.
#[must_use]
pub fn archive_path(parent_directory: &Path, dependency: &ChartDependency) -> PathBuf {
    parent_directory
        .join(CHARTS_DIR)
        .join(format!("{}-{}.tgz", dependency.name, dependency.version))
}
