//! Sub-chart dependency resolution.
//!
//! Given a parsed root chart and a [`ChartInfoCache`](crate::chart::ChartInfoCache)
//! of every known chart, this module walks the dependency tree and produces
//! the values tree of every reachable sub-chart, each tagged with the dotted
//! prefix its values live under in the root chart (`parent.child`).
//!
//! # Components
//!
//! - [`locator`] - Maps a dependency declaration to a chart directory,
//!   unpacking `.tgz` archives on demand
//! - [`resolver`] - Depth-first, pre-order walk building prefixes
//! - [`archive`] - gzip'd tarball extraction
//! - [`scratch`] - [`ScratchSpace`], owner of every unpacked archive directory
//!
//! # Failure model
//!
//! A dependency that cannot be found is never fatal. It is logged, recorded
//! as a [`SkippedDependency`], and its whole subtree is left out. Only
//! structural failures, such as a dependency cycle under
//! [`CyclePolicy::Error`], abort the walk.

pub mod archive;
pub mod locator;
pub mod resolver;
pub mod scratch;

pub use locator::{Located, Locator};
pub use resolver::{CyclePolicy, DependencyResolver, DependencyValues, Resolution};
pub use scratch::ScratchSpace;

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::chart::ChartDependency;

/// Why a dependency contributed nothing to the resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum SkipReason {
    /// Remote repository and no pre-fetched `<name>-<version>.tgz` on disk.
    RemoteWithoutArchive {
        /// Archive path that was checked.
        archive: PathBuf,
    },
    /// The archive exists but could not be unpacked.
    ExtractionFailed {
        /// Archive that failed to unpack.
        archive: PathBuf,
        /// Extraction error, with its cause chain.
        error: String,
    },
    /// No parsed chart is cached for the resolved directory.
    NotFound {
        /// Directory the dependency resolved to.
        search_path: PathBuf,
    },
    /// The resolved directory is already being visited higher up the tree.
    Cycle {
        /// Directory the dependency resolved to.
        search_path: PathBuf,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RemoteWithoutArchive {
                archive,
            } => write!(f, "remote dependency without local archive {}", archive.display()),
            Self::ExtractionFailed {
                archive,
                error,
            } => write!(f, "failed to extract {}: {error}", archive.display()),
            Self::NotFound {
                search_path,
            } => write!(f, "no chart found at {}", search_path.display()),
            Self::Cycle {
                search_path,
            } => write!(f, "circular reference to {}", search_path.display()),
        }
    }
}

/// A dependency left out of the resolution, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDependency {
    /// Directory of the chart declaring the dependency.
    pub chart_directory: PathBuf,
    /// The declaration as written in `Chart.yaml`.
    pub dependency: ChartDependency,
    /// Why it was skipped.
    #[serde(flatten)]
    pub reason: SkipReason,
}

impl fmt::Display for SkippedDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (declared in {}): {}",
            self.dependency.namespace(),
            self.chart_directory.display(),
            self.reason
        )
    }
}
