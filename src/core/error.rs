//! Error handling for helmdoc
//!
//! This module provides the typed error enum used across the crate and the
//! user-facing error reporting used by the CLI. Two principles drive it:
//! 1. **Strongly-typed errors** for failures callers may want to match on
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`HelmdocError`] - Enumerated error types for all hard failures
//! - [`ErrorContext`] - Wrapper that adds user-friendly details and suggestions
//!
//! Missing or unresolvable chart dependencies are *not* errors: the resolver
//! records them as skips and keeps going. Only structural failures (unreadable
//! charts requested directly, dependency cycles, I/O failures) surface here.
//!
//! # Examples
//!
//! ```rust,no_run
//! use helmdoc::core::{HelmdocError, ErrorContext, user_friendly_error};
//!
//! let error = HelmdocError::CircularDependency {
//!     chain: "charts/a → charts/b → charts/a".to_string(),
//! };
//!
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::core::file_error::FileOperationError;

/// The main error type for helmdoc operations
///
/// # Error Categories
///
/// ## Chart loading
/// - [`ChartNotFound`] - Directory has no `Chart.yaml`
/// - [`ChartParseError`] - `Chart.yaml` is not valid chart metadata
/// - [`ValuesParseError`] - The values file is not valid YAML
///
/// ## Dependency resolution
/// - [`CircularDependency`] - A chart transitively depends on itself
/// - [`ArchiveError`] - A packaged sub-chart could not be unpacked
///
/// ## Configuration and platform
/// - [`ConfigError`] - Invalid `helmdoc.toml` or CLI combination
/// - [`FileSystemError`] / [`PermissionDenied`] - Filesystem failures
///
/// [`ChartNotFound`]: HelmdocError::ChartNotFound
/// [`ChartParseError`]: HelmdocError::ChartParseError
/// [`ValuesParseError`]: HelmdocError::ValuesParseError
/// [`CircularDependency`]: HelmdocError::CircularDependency
/// [`ArchiveError`]: HelmdocError::ArchiveError
/// [`ConfigError`]: HelmdocError::ConfigError
/// [`FileSystemError`]: HelmdocError::FileSystemError
/// [`PermissionDenied`]: HelmdocError::PermissionDenied
#[derive(Error, Debug, Clone)]
pub enum HelmdocError {
    /// Chart directory does not contain a `Chart.yaml`
    #[error("No Chart.yaml found in {path}")]
    ChartNotFound {
        /// Directory that was expected to hold a chart
        path: String,
    },

    /// `Chart.yaml` could not be parsed
    #[error("Invalid chart metadata in {file}")]
    ChartParseError {
        /// Path to the Chart.yaml that failed to parse
        file: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    /// Values file could not be parsed
    #[error("Invalid values file {file}")]
    ValuesParseError {
        /// Path to the values file that failed to parse
        file: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    /// Circular dependency detected while walking sub-charts
    ///
    /// Raised when a sub-chart resolves to a chart directory that is already
    /// being visited higher up the dependency chain.
    ///
    /// # Fields
    /// - `chain`: The chart directories forming the cycle, joined with `→`
    #[error("Circular dependency detected: {chain}")]
    CircularDependency {
        /// String representation of the circular dependency chain
        chain: String,
    },

    /// Packaged chart archive could not be extracted
    #[error("Failed to extract chart archive {archive}: {reason}")]
    ArchiveError {
        /// Path to the `.tgz` archive
        archive: String,
        /// Reason the extraction failed
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// File system error
    #[error("File system error: {operation}")]
    FileSystemError {
        /// The file system operation that failed
        operation: String,
        /// Path where the file system error occurred
        path: String,
    },

    /// Permission denied
    #[error("Permission denied: {operation}")]
    PermissionDenied {
        /// The operation that was denied due to insufficient permissions
        operation: String,
        /// Path where permission was denied
        path: String,
    },

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

/// Error context wrapper that provides user-friendly error information
///
/// When displayed, errors show:
/// 1. **Error**: The main error message in red
/// 2. **Details**: Additional context about the error in yellow (optional)
/// 3. **Suggestion**: Actionable steps to resolve the issue in green (optional)
///
/// ```rust,no_run
/// use helmdoc::core::{HelmdocError, ErrorContext};
///
/// let context = ErrorContext::new(HelmdocError::ChartNotFound {
///     path: "charts/web".to_string(),
/// })
/// .with_suggestion("Point --chart at a directory containing Chart.yaml");
///
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying helmdoc error
    pub error: HelmdocError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: HelmdocError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`HelmdocError`], [`FileOperationError`], [`std::io::Error`] and
/// [`toml::de::Error`]; anything else is reported with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(helmdoc_error) = error.downcast_ref::<HelmdocError>() {
        return create_error_context(helmdoc_error.clone());
    }

    if let Some(file_error) = error.downcast_ref::<FileOperationError>() {
        return ErrorContext::new(HelmdocError::FileSystemError {
            operation: file_error.operation.to_string(),
            path: file_error.file_path.display().to_string(),
        })
        .with_details(file_error.user_message());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(HelmdocError::PermissionDenied {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check ownership and permissions of the chart directories")
                .with_details("helmdoc could not read a file or create a scratch directory");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(HelmdocError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct")
                .with_details(
                    "This error occurs when a required file or directory cannot be found",
                );
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(HelmdocError::ConfigError {
            message: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax in your helmdoc.toml file");
    }

    let mut message = error.to_string();

    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(HelmdocError::Other {
        message,
    })
}

/// Map each [`HelmdocError`] variant to suggestions and details.
fn create_error_context(error: HelmdocError) -> ErrorContext {
    match &error {
        HelmdocError::ChartNotFound { path } => ErrorContext::new(error.clone())
            .with_suggestion("Point --chart at a directory containing Chart.yaml, or pass a search root to discover charts")
            .with_details(format!("{path} is not a Helm chart directory")),

        HelmdocError::ChartParseError { file, reason } => ErrorContext::new(error.clone())
            .with_suggestion(format!("Fix the YAML in {file}. Chart.yaml needs at least 'name' and 'version'"))
            .with_details(reason.clone()),

        HelmdocError::ValuesParseError { file, reason } => ErrorContext::new(error.clone())
            .with_suggestion(format!("Check the YAML syntax of {file} with 'helm lint'"))
            .with_details(reason.clone()),

        HelmdocError::CircularDependency { chain } => ErrorContext::new(error.clone())
            .with_suggestion("Remove the dependency that points back to an ancestor chart, or run with --on-cycle skip")
            .with_details(format!(
                "Circular dependency chain detected: {chain}. A chart cannot depend on itself directly or indirectly"
            )),

        HelmdocError::ArchiveError { archive, .. } => ErrorContext::new(error.clone())
            .with_suggestion(format!("Re-run 'helm dependency update' to re-download {archive}")),

        HelmdocError::PermissionDenied { operation, path } => ErrorContext::new(error.clone())
            .with_suggestion(match cfg!(windows) {
                true => "Run as Administrator or check file permissions in File Explorer",
                false => "Check file permissions with 'ls -la'",
            })
            .with_details(format!(
                "Cannot {operation} due to insufficient permissions on {path}"
            )),

        _ => ErrorContext::new(error),
    }
}
