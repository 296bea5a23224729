//! Application configuration.

use crate::alerts::AlertThresholds;
use crate::error::{ArkaError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the dashboard core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Interval between scheduler ticks in milliseconds
    pub tick_interval_ms: u64,
    /// Directory for the file-backed store; `None` keeps everything in memory
    pub data_dir: Option<PathBuf>,
    /// TTL applied to stored items that do not specify one
    pub default_ttl_ms: u64,
    /// Serialized size above which structured values are encoded
    pub encode_threshold: usize,
    /// Maximum number of chat entries kept
    pub history_capacity: usize,
    /// Maximum number of analytics events kept
    pub analytics_capacity: usize,
    /// Thresholds used by the alert evaluator
    pub alert_thresholds: AlertThresholds,
    /// Multiplier applied to scripted operation durations
    pub operation_time_scale: f64,
    /// Probability that a simulated operation reports success
    pub operation_success_rate: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: crate::DEFAULT_TICK_INTERVAL_MS,
            data_dir: None,
            default_ttl_ms: crate::storage::DEFAULT_TTL_MS,
            encode_threshold: crate::storage::ENCODE_THRESHOLD,
            history_capacity: crate::assistant::history::MAX_ENTRIES,
            analytics_capacity: crate::settings::MAX_ANALYTICS_EVENTS,
            alert_thresholds: AlertThresholds::default(),
            operation_time_scale: 1.0,
            operation_success_rate: 0.9,
        }
    }
}

impl AppConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ArkaError::config_error(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the components cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(ArkaError::config_error("tick_interval_ms must be positive"));
        }
        if self.history_capacity == 0 || self.analytics_capacity == 0 {
            return Err(ArkaError::config_error("capacities must be positive"));
        }
        if !(0.0..=1.0).contains(&self.operation_success_rate) {
            return Err(ArkaError::config_error(
                "operation_success_rate must be within [0, 1]",
            ));
        }
        if !self.operation_time_scale.is_finite() || self.operation_time_scale < 0.0 {
            return Err(ArkaError::config_error(
                "operation_time_scale must be a non-negative number",
            ));
        }
        Ok(())
    }

    /// Set the scheduler tick interval.
    pub fn with_tick_interval(mut self, millis: u64) -> Self {
        self.tick_interval_ms = millis;
        self
    }

    /// Persist state under the given directory.
    pub fn with_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.data_dir = dir;
        self
    }

    /// Set the default TTL for stored items.
    pub fn with_default_ttl(mut self, millis: u64) -> Self {
        self.default_ttl_ms = millis;
        self
    }

    /// Set the chat history capacity.
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Set the alert thresholds.
    pub fn with_alert_thresholds(mut self, thresholds: AlertThresholds) -> Self {
        self.alert_thresholds = thresholds;
        self
    }

    /// Scale scripted operation durations (0 runs them without waiting).
    pub fn with_operation_time_scale(mut self, scale: f64) -> Self {
        self.operation_time_scale = scale;
        self
    }

    /// Set the probability that an operation succeeds.
    pub fn with_operation_success_rate(mut self, rate: f64) -> Self {
        self.operation_success_rate = rate;
        self
    }
}
