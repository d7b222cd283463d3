//! Integration test suite for helmdoc
//!
//! End-to-end tests that run the `helmdoc` binary against chart trees built
//! in temporary directories.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **config**: `helmdoc.toml` lookup and CLI overrides
//! - **deps**: The `deps` command, dependency sources and skip reporting
//! - **values**: The `values` command and prefixed sub-chart values

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod config;
mod deps;
mod values;
