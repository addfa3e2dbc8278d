//! Configuration loading.
//!
//! Every field has a default, so an empty YAML document is a valid config.
//!
//! ```yaml
//! poll_interval_ms: 3000
//! notification_limit: 50
//! sound_alerts: true
//! push_updates: true
//! channel_buffer: 32
//! seed_default_menu: true
//! base_url: "http://localhost:3000"
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable naming a YAML config file for the demo binary.
pub const CONFIG_ENV: &str = "CAFE_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CafeConfig {
    /// Delay between store polls for new orders.
    pub poll_interval_ms: u64,

    /// How many notifications are kept, newest first.
    pub notification_limit: usize,

    /// Ring the alert sink for each newly detected order.
    pub sound_alerts: bool,

    /// Also react to in-process order events instead of waiting for the next
    /// poll.
    pub push_updates: bool,

    /// Capacity of the request channel in front of the state actor.
    pub channel_buffer: usize,

    /// Write the default menu when the store has none.
    pub seed_default_menu: bool,

    /// Base of the per-table ordering links.
    pub base_url: String,
}

impl Default for CafeConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 3000,
            notification_limit: crate::state::DEFAULT_NOTIFICATION_LIMIT,
            sound_alerts: true,
            push_updates: true,
            channel_buffer: 32,
            seed_default_menu: true,
            base_url: "http://localhost:3000".to_string(),
        }
    }
}

impl CafeConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("loading config file {}", path.display()))
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        // An empty document deserializes to unit, not a map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml).context("parsing YAML config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the file named by [`CONFIG_ENV`], or defaults when unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_yaml_file(path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            bail!("poll_interval_ms must be greater than zero");
        }
        if self.notification_limit == 0 {
            bail!("notification_limit must be greater than zero");
        }
        if self.channel_buffer == 0 {
            bail!("channel_buffer must be greater than zero");
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        assert_eq!(CafeConfig::from_yaml_str("").unwrap(), CafeConfig::default());
    }

    #[test]
    fn test_partial_document_keeps_other_defaults() {
        let config = CafeConfig::from_yaml_str("poll_interval_ms: 500\nsound_alerts: false\n").unwrap();
        assert_eq!(config.poll_interval(), Duration::from_millis(500));
        assert!(!config.sound_alerts);
        assert_eq!(config.notification_limit, 50);
        assert!(config.push_updates);
    }

    #[test]
    fn test_zero_values_are_rejected() {
        assert!(CafeConfig::from_yaml_str("poll_interval_ms: 0").is_err());
        assert!(CafeConfig::from_yaml_str("notification_limit: 0").is_err());
        assert!(CafeConfig::from_yaml_str("channel_buffer: 0").is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = CafeConfig::from_yaml_file("/nonexistent/cafe.yaml").unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/cafe.yaml"));
    }
}
