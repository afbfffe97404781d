//! # Proxy Configuration
//!
//! Tunables for a [`ProxyRenderer`](crate::proxy::ProxyRenderer): how many idle
//! renderables its pool retains, whether the first tick always rebuilds, and the
//! default log filter used by applications that embed it.
//!
//! Loadable from TOML or RON through the [`Config`] trait:
//!
//! ```toml
//! pool_capacity = { bounded = 8 }
//! assume_changed_on_first_evaluation = true
//! log_level = "info"
//! ```

use serde::{Serialize, Deserialize};
use std::str::FromStr;

pub use crate::config::{Config, ConfigError};

/// Default number of idle renderables kept by a proxy's pool
pub const DEFAULT_POOL_CAPACITY: usize = 8;

/// Soft limit on the number of idle objects a pool keeps around
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolCapacity {
    /// Releases beyond this many idle objects are disposed
    Bounded(usize),
    /// Every released object is retained
    Unbounded,
}

impl PoolCapacity {
    /// The limit as an optional count (`None` = unbounded)
    pub fn limit(self) -> Option<usize> {
        match self {
            Self::Bounded(capacity) => Some(capacity),
            Self::Unbounded => None,
        }
    }
}

impl Default for PoolCapacity {
    fn default() -> Self {
        Self::Bounded(DEFAULT_POOL_CAPACITY)
    }
}

/// # Proxy Renderer Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Idle renderable capacity of the per-proxy pool
    pub pool_capacity: PoolCapacity,
    /// Force a rebuild on the very first tick
    pub assume_changed_on_first_evaluation: bool,
    /// Default log filter for applications embedding the proxy
    pub log_level: String,
}

impl ProxyConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self {
            pool_capacity: PoolCapacity::default(),
            assume_changed_on_first_evaluation: true,
            log_level: "info".to_string(),
        }
    }

    /// Set a bounded pool capacity
    pub fn with_pool_capacity(mut self, capacity: usize) -> Self {
        self.pool_capacity = PoolCapacity::Bounded(capacity);
        self
    }

    /// Retain every released renderable
    pub fn unbounded_pool(mut self) -> Self {
        self.pool_capacity = PoolCapacity::Unbounded;
        self
    }

    /// Choose whether the first tick always rebuilds
    pub fn with_first_evaluation_forced(mut self, forced: bool) -> Self {
        self.assume_changed_on_first_evaluation = forced;
        self
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_capacity == PoolCapacity::Bounded(0) {
            return Err(ConfigError::Invalid(
                "pool capacity must be at least 1 (use `unbounded` to disable the limit)".to_string(),
            ));
        }

        if log::LevelFilter::from_str(&self.log_level).is_err() {
            return Err(ConfigError::Invalid(format!("unknown log level '{}'", self.log_level)));
        }

        Ok(())
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for ProxyConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProxyConfig::default();
        assert_eq!(config.pool_capacity.limit(), Some(DEFAULT_POOL_CAPACITY));
        assert!(config.assume_changed_on_first_evaluation);
        assert_eq!(config.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = ProxyConfig::new()
            .with_pool_capacity(3)
            .with_first_evaluation_forced(false)
            .with_log_level("debug");
        assert_eq!(config.pool_capacity, PoolCapacity::Bounded(3));
        assert!(!config.assume_changed_on_first_evaluation);
        assert_eq!(config.log_level, "debug");

        let unbounded = ProxyConfig::new().unbounded_pool();
        assert_eq!(unbounded.pool_capacity.limit(), None);
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let config = ProxyConfig::new().with_pool_capacity(0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_unknown_log_level() {
        let config = ProxyConfig::new().with_log_level("loud");
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_parse_partial_toml_uses_defaults() {
        let config = ProxyConfig::from_toml_str("log_level = \"warn\"\n").unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.pool_capacity, PoolCapacity::default());
        assert!(config.assume_changed_on_first_evaluation);
    }

    #[test]
    fn test_parse_unbounded_toml() {
        let config = ProxyConfig::from_toml_str("pool_capacity = \"unbounded\"\n").unwrap();
        assert_eq!(config.pool_capacity, PoolCapacity::Unbounded);
    }

    #[test]
    fn test_toml_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proxy.toml");
        let config = ProxyConfig::new().with_pool_capacity(4).with_log_level("trace");

        config.save_to_file(&path).unwrap();
        let loaded = ProxyConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ron_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proxy.ron");
        let config = ProxyConfig::new().unbounded_pool().with_first_evaluation_forced(false);

        config.save_to_file(&path).unwrap();
        let loaded = ProxyConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proxy.json");
        let result = ProxyConfig::default().save_to_file(&path);
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
