//! Registry configuration.

use serde::{Deserialize, Serialize};
use trafficmanager_errors::ValidationError;

/// Smallest accepted shard count.
pub const MIN_SHARDS: usize = 1;
/// Largest accepted shard count.
pub const MAX_SHARDS: usize = 1024;

/// Configuration for [`TrackTraffic`](crate::TrackTraffic).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackTrafficConfig {
    /// Shards per map. Must be a power of two in `1..=1024`.
    pub shard_count: usize,
}

impl Default for TrackTrafficConfig {
    fn default() -> Self {
        Self { shard_count: 64 }
    }
}

impl TrackTrafficConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `shard_count` is out of range or not a power of two.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(MIN_SHARDS..=MAX_SHARDS).contains(&self.shard_count) {
            return Err(ValidationError::out_of_range(
                "shard_count",
                self.shard_count,
                MIN_SHARDS,
                MAX_SHARDS,
            ));
        }
        if !self.shard_count.is_power_of_two() {
            return Err(ValidationError::constraint(format!(
                "shard_count must be a power of two, got {}",
                self.shard_count
            )));
        }
        Ok(())
    }

    /// Shard count actually used: clamped into range and rounded up to a
    /// power of two.
    #[must_use]
    pub fn effective_shard_count(&self) -> usize {
        self.shard_count
            .clamp(MIN_SHARDS, MAX_SHARDS)
            .next_power_of_two()
    }

    /// Create a configuration builder.
    #[must_use]
    pub fn builder() -> TrackTrafficConfigBuilder {
        TrackTrafficConfigBuilder::default()
    }
}

/// Builder for `TrackTrafficConfig`.
#[derive(Debug, Default)]
pub struct TrackTrafficConfigBuilder {
    config: TrackTrafficConfig,
}

impl TrackTrafficConfigBuilder {
    /// Set the number of shards per map.
    #[must_use]
    pub fn shard_count(mut self, count: usize) -> Self {
        self.config.shard_count = count;
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> Result<TrackTrafficConfig, ValidationError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
