//! Muninn error types

/// Muninn error types
#[derive(Debug, thiserror::Error)]
pub enum MuninnError {
    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("provider {0:?} not registered")]
    ProviderNotRegistered(String),

    /// Primary provider and every viable fallback exhausted their retry
    /// budgets. Wraps the most recent underlying error for diagnosis.
    #[error("all providers failed; last error: {source}")]
    AllProvidersFailed {
        #[source]
        source: Box<MuninnError>,
    },

    /// The request could not be canonically serialized for a cache key.
    /// Non-fatal: caching is skipped for that call, the completion proceeds.
    #[error("cache key encoding failed: {0}")]
    CacheEncoding(#[from] serde_json::Error),

    /// The caller's cancellation token fired; no further attempts are made.
    #[error("request cancelled")]
    Cancelled,

    // Provider/network errors (reported by adapters before any output)
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Streaming errors
    #[error("stream error: {0}")]
    Stream(String),
}

/// Result type alias for Muninn operations
pub type Result<T> = std::result::Result<T, MuninnError>;
