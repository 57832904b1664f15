//! Core error types for the cache

use std::path::PathBuf;

/// Result type for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

/// Re-export CacheError as Error
pub use CacheError as Error;

/// Error type for cache operations
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The entry, or one of its parent directories, does not exist
    #[error("cache entry '{}' not found", path.display())]
    NotFound { path: PathBuf },

    /// The stored envelope names an encoding this store does not read
    #[error("cached data (format {found:?}) is not in a known format, expected {expected:?}")]
    FormatMismatch {
        expected: &'static str,
        found: String,
    },

    /// The key cannot address an entry
    #[error("invalid cache key: {reason}")]
    InvalidKey { reason: String },

    /// The structured encoder or decoder rejected the value
    #[error("failed to {operation} cache value: {source}")]
    Serialization {
        operation: SerializationOp,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The gzip stream could not be written or read back
    #[error("{operation} failed: {source}")]
    Compression {
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Any other filesystem failure
    #[error("I/O error during {operation} on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The store was configured with values it cannot use
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

/// Direction of a serialization failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializationOp {
    Encode,
    Decode,
}

impl std::fmt::Display for SerializationOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode => f.write_str("encode"),
            Self::Decode => f.write_str("decode"),
        }
    }
}
