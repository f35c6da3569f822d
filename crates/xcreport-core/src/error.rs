//! Error types for xcreport.
//!
//! Variants are grouped by subsystem and carry an actionable suggestion
//! where one exists.

use std::path::PathBuf;

/// A specialized `Result` type for xcreport operations.
pub type Result<T> = std::result::Result<T, XcReportError>;

/// Errors that can occur while generating reports.
#[derive(Debug, thiserror::Error)]
pub enum XcReportError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid JSON syntax in configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your xcreport.json with a JSON linter")]
    ConfigParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidationError {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    // ========================================================================
    // Bundle Errors
    // ========================================================================
    /// The result bundle path does not exist.
    #[error("Result bundle not found: '{path}'\n\nSuggestion: Check the path passed to --resultBundlePath")]
    BundleNotFound {
        /// Path that was given.
        path: PathBuf,
    },

    /// The result bundle lacks its invocation record.
    #[error("Result bundle '{path}' has no invocation record\n\nSuggestion: Export the bundle again; it must contain invocation.json")]
    BundleStructureMissing {
        /// Path to the bundle.
        path: PathBuf,
    },

    /// An object in the bundle could not be parsed.
    #[error("Failed to parse '{path}': {message}\n\nSuggestion: The bundle may be truncated or written by an incompatible exporter")]
    ObjectParseError {
        /// Path to the object file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    // ========================================================================
    // General I/O Errors
    // ========================================================================
    /// General I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl XcReportError {
    /// Creates a new `ConfigParseError` with the given path and message.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigValidationError` with the given message and suggestion.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidationError {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Creates a new `BundleNotFound` error.
    #[must_use]
    pub fn bundle_not_found(path: impl Into<PathBuf>) -> Self {
        Self::BundleNotFound { path: path.into() }
    }

    /// Creates a new `BundleStructureMissing` error.
    #[must_use]
    pub fn bundle_structure_missing(path: impl Into<PathBuf>) -> Self {
        Self::BundleStructureMissing { path: path.into() }
    }

    /// Creates a new `ObjectParseError`.
    #[must_use]
    pub fn object_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ObjectParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if the error should stop the run.
    ///
    /// Everything that prevents reading the input or the configuration is
    /// fatal. Plain I/O and JSON errors are left to the caller.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConfigParseError { .. }
                | Self::ConfigValidationError { .. }
                | Self::BundleNotFound { .. }
                | Self::BundleStructureMissing { .. }
                | Self::ObjectParseError { .. }
        )
    }
}
