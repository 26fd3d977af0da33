//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Errors raised by the cache itself.
///
/// Errors returned by a wrapped computation never pass through this type;
/// they are handed back to the caller unchanged.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The bounded store could not be built from the given parameters
    #[error("can't create cache: {0}")]
    Construction(String),

    /// A computed value could not be encoded for size evaluation
    #[error("can't marshal received object: {0}")]
    Serialization(#[from] serde_json::Error),
}

// == Result Type Alias ==
/// Convenience Result type for cache construction and admission.
pub type Result<T> = std::result::Result<T, CacheError>;
