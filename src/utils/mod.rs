//! Small helpers shared across modules.
//!
//! - [`paths`] - Lexical path normalization used for chart cache keys

pub mod paths;

pub use paths::{join_normalized, normalize_path};
