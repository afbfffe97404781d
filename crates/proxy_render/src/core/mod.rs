//! # Core Module
//!
//! Shared configuration for the proxy renderer and the applications that host it.

pub mod config;

// Re-export commonly used config types
pub use config::{
    ProxyConfig,
    PoolCapacity,
    Config,
    ConfigError,
};
