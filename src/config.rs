//! Sampler configuration (JSON file + CLI overrides).

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{MonitorError, Result};

pub const DEFAULT_SAMPLE_INTERVAL_SECS: u64 = 1;
pub const DEFAULT_BUFFER_CAPACITY: usize = 300;
pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sample_interval_secs: u64,
    pub buffer_capacity: usize,
    pub top_n: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sample_interval_secs: DEFAULT_SAMPLE_INTERVAL_SECS,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl Config {
    /// Load a config file. Missing keys fall back to defaults; the result is validated.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MonitorError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: Config = serde_json::from_str(&content).map_err(|e| {
            MonitorError::Configuration(format!("cannot parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_interval_secs == 0 {
            return Err(MonitorError::Configuration(
                "sample interval must be at least 1 second".into(),
            ));
        }
        if self.buffer_capacity == 0 {
            return Err(MonitorError::Configuration(
                "buffer capacity must be greater than zero".into(),
            ));
        }
        if self.top_n == 0 {
            return Err(MonitorError::Configuration(
                "top-N must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_secs(self.sample_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert_eq!(config.sample_interval_secs, 1);
        assert_eq!(config.buffer_capacity, 300);
        assert_eq!(config.top_n, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_values_rejected() {
        let zero_interval = Config { sample_interval_secs: 0, ..Config::default() };
        let zero_capacity = Config { buffer_capacity: 0, ..Config::default() };
        let zero_top = Config { top_n: 0, ..Config::default() };
        for config in [zero_interval, zero_capacity, zero_top] {
            assert!(matches!(config.validate(), Err(MonitorError::Configuration(_))));
        }
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"top_n": 3}"#).unwrap();
        assert_eq!(config.top_n, 3);
        assert_eq!(config.buffer_capacity, DEFAULT_BUFFER_CAPACITY);
        assert_eq!(config.sample_interval(), Duration::from_secs(1));
    }

    #[test]
    fn load_missing_file_is_configuration_error() {
        let err = Config::load(Path::new("/nonexistent/netpulse.json")).unwrap_err();
        assert!(matches!(err, MonitorError::Configuration(_)));
    }

    #[test]
    fn load_rejects_invalid_values() {
        let path = std::env::temp_dir().join(format!("netpulse-cfg-{}.json", std::process::id()));
        fs::write(&path, r#"{"buffer_capacity": 0}"#).unwrap();
        let result = Config::load(&path);
        let _ = fs::remove_file(&path);
        assert!(matches!(result, Err(MonitorError::Configuration(_))));
    }
}
