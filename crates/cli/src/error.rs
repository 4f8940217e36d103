//! Error types for tmsim

use thiserror::Error;
use trafficmanager_pipeline::PipelineError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Link stopped unexpectedly: {0}")]
    LinkStopped(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::InvalidArgument(_) => 2,
            CliError::Pipeline(
                PipelineError::InvalidConfiguration(_)
                | PipelineError::ConfigParse(_)
                | PipelineError::ConfigIo { .. },
            )
            | CliError::JsonError(_) => 3,
            CliError::Pipeline(_) | CliError::LinkStopped(_) => 4,
        }
    }
}
