//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;

/// Default cache capacity when none is configured.
pub const DEFAULT_MAX_SIZE: usize = 5;

/// Default HTTP port.
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of records held in memory
    pub max_size: usize,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_SIZE` - Cache capacity, must be positive (default: 5)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        Self {
            max_size: env::var("CACHE_MAX_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|size: &usize| *size > 0)
                .unwrap_or(DEFAULT_MAX_SIZE),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            server_port: DEFAULT_SERVER_PORT,
        }
    }
}
