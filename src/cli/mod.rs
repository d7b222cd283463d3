//! Command-line interface for helmdoc.
//!
//! # Commands
//!
//! - `deps` - Show every chart's resolved sub-chart tree and the prefixes
//!   their values live under
//! - `values` - List every chart's values, including those of its
//!   sub-charts, one row per key
//!
//! # Global Options
//!
//! - `--verbose` / `-v`: debug logging
//! - `--quiet` / `-q`: errors only
//! - `--config` / `-c`: path to a `helmdoc.toml` (also `HELMDOC_CONFIG`)
//!
//! `RUST_LOG` takes precedence over `--verbose` and `--quiet`. Logs go to
//! stderr so that `--format json` output on stdout stays parseable.
//!
//! # Examples
//!
//! ```bash
//! # Dependency tree of every chart under ./charts
//! helmdoc deps charts
//!
//! # Values of a single chart as JSON
//! helmdoc values --chart charts/app --format json
//!
//! # Keep going past circular file:// references
//! helmdoc deps --on-cycle skip
//! ```

pub mod common;
mod deps;
mod values;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Runtime settings derived from the global flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter directive, `None` to keep the default (`info`).
    pub log_level: Option<String>,

    /// Explicit configuration file.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// `RUST_LOG`, when set, overrides the level chosen by flags. Calling this
    /// more than once is harmless.
    pub fn init_logging(&self) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(self.log_level.as_deref().unwrap_or("info"))
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Document Helm chart values across sub-chart dependencies.
#[derive(Parser, Debug)]
#[command(
    name = "helmdoc",
    about = "Resolve Helm sub-chart dependencies and document their values",
    version,
    long_about = "helmdoc walks a Helm chart's dependencies (vendored directories, file:// \
                  references and pre-fetched .tgz archives) and reports the values every \
                  sub-chart contributes, under the prefix they are set with in the parent chart."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to a helmdoc.toml configuration file
    #[arg(short, long, global = true, env = "HELMDOC_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show resolved sub-chart dependencies
    Deps(deps::DepsCommand),

    /// List chart values, including sub-chart values
    Values(values::ValuesCommand),
}

impl Cli {
    /// Run the selected command with settings from the global flags.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Deps(cmd) => cmd.execute(config.config_path.as_deref()).await,
            Commands::Values(cmd) => cmd.execute(config.config_path.as_deref()).await,
        }
    }
}
