//! Scratch directories for unpacked chart archives.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::core::{FileOperation, FileResultExt};

/// Owner of every temporary directory created while resolving one chart.
///
/// Archived sub-charts are unpacked into scratch directories that must stay
/// on disk until the whole dependency tree has been walked, because their
/// parsed info (and the paths inside it) is referenced by later steps. The
/// top-level resolution hands this guard back to the caller; dropping it, or
/// calling [`close`](Self::close), removes every directory exactly once.
#[derive(Debug, Default)]
pub struct ScratchSpace {
    dirs: Vec<TempDir>,
}

impl ScratchSpace {
    /// Create an empty scratch space.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh temporary directory whose name starts with `prefix`.
    pub fn allocate(&mut self, prefix: &str) -> Result<PathBuf> {
        let dir = tempfile::Builder::new()
            .prefix(&format!("helmdoc-{prefix}-"))
            .tempdir()
            .with_file_context(
                FileOperation::CreateDir,
                std::env::temp_dir(),
                "creating scratch directory for chart archive",
                "dependency::scratch",
            )?;

        let path = dir.path().to_path_buf();
        tracing::debug!("Allocated scratch directory {}", path.display());
        self.dirs.push(dir);
        Ok(path)
    }

    /// Number of directories currently owned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    /// Whether no directory has been allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    /// Paths of the owned directories, in allocation order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.dirs.iter().map(TempDir::path)
    }

    /// Remove every directory, reporting the first failure.
    ///
    /// All directories are attempted even if an earlier removal fails.
    pub fn close(self) -> Result<()> {
        let mut first_error = None;

        for dir in self.dirs {
            let path = dir.path().to_path_buf();
            if let Err(e) = dir.close() {
                tracing::warn!("Failed to remove scratch directory {}: {}", path.display(), e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}
