//! Cache store configuration
use crate::envelope::{DEFAULT_COMPRESSION_LEVEL, MAX_COMPRESSION_LEVEL};
use crate::errors::{CacheError, Result};
use crate::keys::leading_dot_dirs_supported;
use fscache_utils::LockingMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything needed to open a [`CacheDir`](crate::CacheDir)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheDirConfig {
    /// Directory backing the cache; created if missing
    pub root: PathBuf,
    /// gzip level for stored values (0-9)
    pub compression_level: u32,
    /// Replace the leading `.` of directory key components with `_`; on by
    /// default only where such directories are a problem
    pub dot_safe_dirs: bool,
    /// How entries are protected against concurrent access
    pub locking: LockingMode,
}

impl Default for CacheDirConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(".cache"),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            dot_safe_dirs: !leading_dot_dirs_supported(),
            locking: LockingMode::Auto,
        }
    }
}

impl CacheDirConfig {
    /// Default configuration rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Reject settings the store cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.root.as_os_str().is_empty() {
            return Err(CacheError::configuration("cache root must not be empty"));
        }
        validate_compression_level(self.compression_level)
    }
}

pub(crate) fn validate_compression_level(level: u32) -> Result<()> {
    if level > MAX_COMPRESSION_LEVEL {
        return Err(CacheError::configuration(format!(
            "compression level {level} is out of range 0-{MAX_COMPRESSION_LEVEL}"
        )));
    }
    Ok(())
}
