//! Test utilities for helmdoc
//!
//! Helpers shared by unit tests and the integration suite: one-time tracing
//! setup and [`ChartFixture`], a builder that writes chart directories and
//! packaged `.tgz` archives to disk.
//!
//! # Example
//!
//! ```rust,no_run
//! use helmdoc::chart::ChartDependency;
//! use helmdoc::test_utils::ChartFixture;
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! ChartFixture::new("app", "1.0.0")
//!     .values("# -- Replica count\nreplicas: 1\n")
//!     .dependency(ChartDependency::new("redis", "17.0.0", "https://charts.bitnami.com/bitnami"))
//!     .write(&temp.path().join("app"))
//!     .unwrap();
//! ```

pub mod fixtures;

pub use fixtures::ChartFixture;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` when given, otherwise the
/// `RUST_LOG` environment variable; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=helmdoc=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
