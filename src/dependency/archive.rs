//! Packaged chart archive extraction.
//!
//! Remote dependencies fetched by `helm dependency update` are stored as
//! gzip-compressed tarballs under `charts/<name>-<version>.tgz`. Each archive
//! contains a single top-level directory named after the chart.

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::scratch::ScratchSpace;
use crate::core::{FileOperation, FileResultExt, HelmdocError};

/// Extract a gzip-compressed tarball into `destination`.
///
/// Entries whose paths would escape `destination` (absolute paths or `..`
/// components) are skipped rather than written.
pub fn extract_tgz<R: Read>(destination: &Path, reader: R) -> Result<()> {
    let mut archive = tar::Archive::new(GzDecoder::new(reader));
    archive.set_preserve_permissions(false);

    let entries = archive.entries().context("Failed to read archive entries")?;
    for entry in entries {
        let mut entry = entry.context("Failed to read archive entry")?;
        let entry_path = entry.path().map(|p| p.into_owned()).unwrap_or_default();

        let unpacked = entry
            .unpack_in(destination)
            .with_context(|| format!("Failed to unpack {}", entry_path.display()))?;
        if !unpacked {
            tracing::debug!("Skipped archive entry outside destination: {}", entry_path.display());
        }
    }

    Ok(())
}

/// Unpack a chart archive into a new scratch directory.
///
/// Returns `<scratch dir>/<chart_name>`, the directory the chart is expected
/// to occupy once extracted. The scratch directory is owned by `scratch` and
/// removed when it is dropped, whether or not extraction succeeded.
pub fn unpack_chart(archive: &Path, chart_name: &str, scratch: &mut ScratchSpace) -> Result<PathBuf> {
    let dir = scratch.allocate(chart_name)?;

    let file = File::open(archive).with_file_context(
        FileOperation::Open,
        archive,
        "unpacking chart archive",
        "dependency::archive",
    )?;

    extract_tgz(&dir, file).map_err(|e| HelmdocError::ArchiveError {
        archive: archive.display().to_string(),
        reason: format!("{e:#}"),
    })?;

    Ok(dir.join(chart_name))
}
