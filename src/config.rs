//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::CacheError;

/// Default interval between background sweeps, in milliseconds.
pub const DEFAULT_CLEANUP_INTERVAL_MS: u64 = 1000;

// == Cache Variant ==
/// Which cache implementation to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheVariant {
    /// `ConcurrentTtlCache`, shareable across threads
    #[default]
    Concurrent,
    /// `SimpleTtlCache`, single-threaded
    Simple,
}

impl FromStr for CacheVariant {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "concurrent" | "async" => Ok(Self::Concurrent),
            "simple" | "sync" => Ok(Self::Simple),
            other => Err(CacheError::InvalidVariant(other.to_string())),
        }
    }
}

impl fmt::Display for CacheVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concurrent => write!(f, "concurrent"),
            Self::Simple => write!(f, "simple"),
        }
    }
}

// == Config ==
/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Interval between background sweeps
    pub cleanup_interval: Duration,
    /// Cache implementation to use
    pub variant: CacheVariant,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CLEANUP_INTERVAL_MS` - Sweep frequency in milliseconds (default: 1000)
    /// - `CACHE_VARIANT` - `concurrent` or `simple` (default: concurrent)
    ///
    /// A zero interval falls back to the default.
    pub fn from_env() -> Self {
        let cleanup_interval_ms = env::var("CLEANUP_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_CLEANUP_INTERVAL_MS);

        Self {
            cleanup_interval: Duration::from_millis(cleanup_interval_ms),
            variant: env::var("CACHE_VARIANT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cleanup_interval: Duration::from_millis(DEFAULT_CLEANUP_INTERVAL_MS),
            variant: CacheVariant::Concurrent,
        }
    }
}
