//! Configuration for helmdoc
//!
//! helmdoc runs without any configuration. An optional `helmdoc.toml` can
//! change how charts are discovered and parsed; command-line flags always
//! take precedence over it.
//!
//! # Lookup
//!
//! 1. `--config <PATH>` (or the `HELMDOC_CONFIG` environment variable); the
//!    file must exist
//! 2. `helmdoc.toml` in the chart search root, if present
//! 3. Built-in defaults
//!
//! # Format
//!
//! ```toml
//! # Values file read from every chart directory
//! values_file = "values.yaml"
//!
//! # Glob patterns (relative to the search root) of directories to skip
//! ignore = ["vendor/**", "tmp"]
//!
//! # "error" (default) or "skip"
//! on_cycle = "skip"
//! ```

mod project;

pub use project::{CONFIG_FILE_NAME, HelmdocConfig};
