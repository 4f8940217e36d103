//! Session configuration.
//!
//! [`TrafficManagerConfig`] groups the registry and pipeline sections and can
//! be loaded from, or saved to, a JSON file. Missing fields take their
//! defaults, so `{}` is a valid configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use trafficmanager_errors::ValidationError;
use trafficmanager_track::TrackTrafficConfig;

use crate::error::{PipelineError, PipelineResult};

/// Stage thread settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Sleep between re-checks while a stage's links are stopped (milliseconds).
    pub stage_backoff_ms: u64,
    /// Prefix of every stage thread name.
    pub thread_name_prefix: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stage_backoff_ms: 5,
            thread_name_prefix: "tm".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Largest accepted backoff.
    pub const MAX_BACKOFF_MS: u64 = 1_000;

    /// Backoff as a `Duration`.
    #[must_use]
    pub fn stage_backoff(&self) -> Duration {
        Duration::from_millis(self.stage_backoff_ms)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the backoff is out of range or the thread name
    /// prefix is empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=Self::MAX_BACKOFF_MS).contains(&self.stage_backoff_ms) {
            return Err(ValidationError::out_of_range(
                "stage_backoff_ms",
                self.stage_backoff_ms,
                1,
                Self::MAX_BACKOFF_MS,
            ));
        }
        if self.thread_name_prefix.trim().is_empty() {
            return Err(ValidationError::required("thread_name_prefix"));
        }
        Ok(())
    }

    /// Create a configuration builder.
    #[must_use]
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }
}

/// Builder for `PipelineConfig`.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// Set the stopped-link backoff in milliseconds.
    #[must_use]
    pub fn stage_backoff_ms(mut self, ms: u64) -> Self {
        self.config.stage_backoff_ms = ms;
        self
    }

    /// Set the thread name prefix.
    #[must_use]
    pub fn thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.thread_name_prefix = prefix.into();
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> Result<PipelineConfig, ValidationError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Complete configuration of one traffic manager session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficManagerConfig {
    /// Registry settings.
    pub track: TrackTrafficConfig,
    /// Stage thread settings.
    pub pipeline: PipelineConfig,
}

impl TrafficManagerConfig {
    /// Parse a configuration from JSON text. The result is not validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON for this shape.
    pub fn from_json_str(text: &str) -> PipelineResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load_from_path(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| PipelineError::config_io(path, e))?;
        let config = Self::from_json_str(&content)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded traffic manager config");
        Ok(config)
    }

    /// Write the configuration as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> PipelineResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| PipelineError::config_io(parent, e))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| PipelineError::config_io(path, e))?;
        tracing::debug!(path = %path.display(), "Saved traffic manager config");
        Ok(())
    }

    /// Validate both sections.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.track.validate()?;
        self.pipeline.validate()
    }
}
