//! Core types and error handling shared by every helmdoc module.
//!
//! - [`error`] - [`HelmdocError`], [`ErrorContext`] and CLI-facing error conversion
//! - [`file_error`] - Filesystem errors that carry the operation, path and purpose

pub mod error;
pub mod file_error;

pub use error::{ErrorContext, HelmdocError, user_friendly_error};
pub use file_error::{FileOperation, FileOperationError, FileResultExt};
