//! Error types for pipeline sessions.

use std::path::PathBuf;

use thiserror::Error;
use trafficmanager_errors::{TrafficManagerError, ValidationError};

/// Errors raised while building or tearing down a session.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The OS refused to start a stage thread.
    #[error("Failed to spawn stage '{stage}': {source}")]
    SpawnFailed {
        /// Stage name.
        stage: String,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The session was already shut down.
    #[error("Session is shut down")]
    ShutDown,

    /// Configuration rejected by validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ValidationError),

    /// Configuration file could not be read or written.
    #[error("Config file {path}: {source}")]
    ConfigIo {
        /// File involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration text is not valid JSON for the expected shape.
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl PipelineError {
    /// Create a spawn failure error.
    #[must_use]
    pub fn spawn_failed(stage: impl Into<String>, source: std::io::Error) -> Self {
        Self::SpawnFailed {
            stage: stage.into(),
            source,
        }
    }

    /// Create a config I/O error.
    #[must_use]
    pub fn config_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigIo {
            path: path.into(),
            source,
        }
    }
}

impl From<PipelineError> for TrafficManagerError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::InvalidConfiguration(validation) => Self::Validation(validation),
            PipelineError::ConfigParse(parse) => Self::config(parse.to_string()),
            PipelineError::ConfigIo { source, .. } => Self::Io(source),
            other => Self::pipeline(other.to_string()),
        }
    }
}

/// A specialized `Result` type for pipeline operations.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
