//! Error types for the shelfscan library.
//!
//! Structured error types that preserve context across the scan pipeline and
//! the report loader. I/O and schema errors are fatal at the scan / load
//! boundary; everything internal is either a recoverable per-file skip or a
//! non-fatal warning recorded in the report.

use std::io;

use thiserror::Error;

/// Main result type for shelfscan operations.
pub type Result<T> = std::result::Result<T, ShelfscanError>;

/// Comprehensive error type for all shelfscan operations.
#[derive(Error, Debug)]
pub enum ShelfscanError {
    /// I/O related errors (corpus reads, report writes)
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
        /// Configuration field that caused the error
        field: Option<String>,
    },

    /// Report schema or consistency errors
    #[error("Report error: {message}")]
    Report {
        /// Error description
        message: String,
        /// Report path, when the error is tied to an artifact on disk
        path: Option<String>,
    },

    /// Validation errors for input data
    #[error("Validation error: {message}")]
    Validation {
        /// Error description
        message: String,
        /// Field or input that failed validation
        field: Option<String>,
    },

    /// Query errors (bad pattern, unknown marketplace or plugin)
    #[error("Query error: {message}")]
    Query {
        /// Error description
        message: String,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal {
        /// Error description
        message: String,
        /// Additional context
        context: Option<String>,
    },
}

impl ShelfscanError {
    /// Create a new I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new configuration error with field context
    pub fn config_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new report error
    pub fn report(message: impl Into<String>) -> Self {
        Self::Report {
            message: message.into(),
            path: None,
        }
    }

    /// Create a new report error tied to an artifact path
    pub fn report_at(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Report {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new query error
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            context: None,
        }
    }

    /// Add context to an existing error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        match &mut self {
            Self::Internal { context: ctx, .. } => {
                *ctx = Some(context.into());
            }
            Self::Report { path, .. } if path.is_none() => {
                *path = Some(context.into());
            }
            _ => {}
        }
        self
    }
}

impl From<io::Error> for ShelfscanError {
    fn from(err: io::Error) -> Self {
        Self::io("I/O operation failed", err)
    }
}

impl From<serde_json::Error> for ShelfscanError {
    fn from(err: serde_json::Error) -> Self {
        Self::report(format!("JSON serialization failed: {err}"))
    }
}

impl From<serde_yaml::Error> for ShelfscanError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::config(format!("YAML serialization failed: {err}"))
    }
}

/// Result extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<ShelfscanError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}
