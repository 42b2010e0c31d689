//! Error types for the cache
//!
//! Lookups never fail; a missing or expired key is `None`. Errors only arise
//! when building a cache or parsing its configuration.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache construction and configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Cleanup interval of zero
    #[error("Invalid cleanup interval: must be greater than zero")]
    InvalidInterval,

    /// No Tokio runtime to host the sweep task
    #[error("No async runtime: {0}")]
    NoRuntime(String),

    /// Unknown cache variant name
    #[error("Invalid cache variant: {0}")]
    InvalidVariant(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
