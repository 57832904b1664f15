//! Error construction helpers

use super::types::{CacheError, SerializationOp};
use std::io;
use std::path::{Path, PathBuf};

/// Errors from raw entry files returned by `open`/`create` carry no path
impl From<io::Error> for CacheError {
    fn from(error: io::Error) -> Self {
        Self::io(PathBuf::new(), "unknown", error)
    }
}

impl CacheError {
    /// Classify a filesystem error raised while working on `path`.
    ///
    /// `NotFound` gets its own variant; everything else keeps the operation
    /// that failed.
    pub fn io(path: impl AsRef<Path>, operation: &'static str, source: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io {
                path,
                operation,
                source,
            }
        }
    }

    /// Wrap an encoder failure
    pub fn encode(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Serialization {
            operation: SerializationOp::Encode,
            source: source.into(),
        }
    }

    /// Wrap a decoder failure
    pub fn decode(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Serialization {
            operation: SerializationOp::Decode,
            source: source.into(),
        }
    }

    /// Build a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
