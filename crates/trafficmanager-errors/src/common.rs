//! Top-level error type and classification shared by every crate.

use core::fmt;

use crate::{ChannelError, ValidationError};

/// Top-level error type that can wrap every traffic manager sub-error.
#[derive(Debug, thiserror::Error)]
pub enum TrafficManagerError {
    /// Messenger was unavailable
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Configuration failed validation
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A pipeline stage could not be started or joined
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl TrafficManagerError {
    /// Get the error category for classification.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            TrafficManagerError::Channel(_) => ErrorCategory::Channel,
            TrafficManagerError::Validation(_) => ErrorCategory::Validation,
            TrafficManagerError::Pipeline(_) => ErrorCategory::Pipeline,
            TrafficManagerError::Io(_) => ErrorCategory::IO,
            TrafficManagerError::Config(_) => ErrorCategory::Config,
            TrafficManagerError::Other(_) => ErrorCategory::Other,
        }
    }

    /// Get the error severity level.
    #[must_use]
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TrafficManagerError::Channel(e) => e.severity(),
            TrafficManagerError::Validation(e) => e.severity(),
            TrafficManagerError::Pipeline(_) => ErrorSeverity::Critical,
            TrafficManagerError::Io(_)
            | TrafficManagerError::Config(_)
            | TrafficManagerError::Other(_) => ErrorSeverity::Error,
        }
    }

    /// Check if this error is recoverable.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        self.severity() < ErrorSeverity::Critical
    }

    /// Create a pipeline error with a message.
    pub fn pipeline(msg: impl Into<String>) -> Self {
        TrafficManagerError::Pipeline(msg.into())
    }

    /// Create a configuration error with a message.
    pub fn config(msg: impl Into<String>) -> Self {
        TrafficManagerError::Config(msg.into())
    }

    /// Create a generic error with a message.
    pub fn other(msg: impl Into<String>) -> Self {
        TrafficManagerError::Other(msg.into())
    }
}

impl From<std::io::Error> for TrafficManagerError {
    fn from(e: std::io::Error) -> Self {
        TrafficManagerError::Io(e)
    }
}

/// Error category for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCategory {
    /// Messenger availability
    Channel = 0,
    /// Input validation
    Validation = 1,
    /// Stage threads and session lifecycle
    Pipeline = 2,
    /// Configuration loading
    Config = 3,
    /// I/O errors
    IO = 4,
    /// Other errors
    Other = 255,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Channel => write!(f, "Channel"),
            ErrorCategory::Validation => write!(f, "Validation"),
            ErrorCategory::Pipeline => write!(f, "Pipeline"),
            ErrorCategory::Config => write!(f, "Config"),
            ErrorCategory::IO => write!(f, "IO"),
            ErrorCategory::Other => write!(f, "Other"),
        }
    }
}

/// Error severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ErrorSeverity {
    /// Informational, no action required
    Info = 0,
    /// Warning, may require attention
    Warning = 1,
    /// Error, operation failed
    Error = 2,
    /// Critical, the session cannot continue
    Critical = 3,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Extension trait for adding an operation name to errors.
pub trait ResultExt<T> {
    /// Prefix the error with the operation that was being performed.
    ///
    /// # Errors
    ///
    /// Returns the original error, converted and annotated.
    fn with_context(self, operation: impl Into<String>) -> Result<T, TrafficManagerError>;
}

impl<T, E: Into<TrafficManagerError>> ResultExt<T> for Result<T, E> {
    fn with_context(self, operation: impl Into<String>) -> Result<T, TrafficManagerError> {
        self.map_err(|e| {
            let err: TrafficManagerError = e.into();
            TrafficManagerError::Other(format!("{}: {}", operation.into(), err))
        })
    }
}
