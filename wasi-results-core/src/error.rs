//! Error taxonomy for the results viewer
//!
//! Every failure the viewer can hit falls into one of five buckets. The HTTP
//! layer maps them onto status codes; nothing in this crate retries.

use thiserror::Error;

/// Result alias used throughout the crate
pub type ResultsResult<T> = Result<T, ResultsError>;

/// Errors raised while loading configuration or talking to the result store
#[derive(Debug, Error)]
pub enum ResultsError {
    /// Missing or invalid configuration, fatal at startup
    #[error("configuration error: {0}")]
    Config(String),

    /// A request path that cannot be used as a store key
    #[error("invalid store key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    /// Store unreachable, timed out, or answered with a non-success status
    #[error("upstream error for '{key}': {reason}")]
    Upstream { key: String, reason: String },

    /// The store holds no object under the requested key
    #[error("no object at '{key}'")]
    NotFound { key: String },

    /// The payload is not a report of the expected shape
    #[error("malformed payload at '{key}': {source}")]
    Parse {
        key:    String,
        #[source]
        source: serde_json::Error,
    },
}

impl ResultsError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an upstream error for the given key
    pub fn upstream(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Upstream {
            key:    key.into(),
            reason: reason.into(),
        }
    }

    /// Create a not-found error for the given key
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Store key (or request target) the error relates to, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Config(_) => None,
            Self::InvalidKey { key, .. }
            | Self::Upstream { key, .. }
            | Self::NotFound { key }
            | Self::Parse { key, .. } => Some(key),
        }
    }

    /// Whether this error means the requested object does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
