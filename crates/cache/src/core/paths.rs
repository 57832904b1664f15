//! Key resolution and lock acquisition for the cache

use crate::envelope::Format;
use crate::errors::{CacheError, Result};
use crate::keys::CacheKey;
use fscache_utils::FileLockGuard;
use std::path::{Path, PathBuf};

use super::invalidation::INVALID_PREFIX;
use super::types::CacheDir;

impl<F: Format> CacheDir<F> {
    /// Path of the file backing `key`
    pub fn entry_path(&self, key: impl Into<CacheKey>) -> Result<PathBuf> {
        self.resolve(&key.into())
    }

    /// Resolve a caller's key; the marker subtree is off limits
    pub(super) fn resolve(&self, key: &CacheKey) -> Result<PathBuf> {
        check_not_empty(key)?;

        let settings = self.inner.settings.read();
        if key.is_under(INVALID_PREFIX, settings.dot_safe_dirs) {
            return Err(CacheError::InvalidKey {
                reason: format!("`{key}` is reserved for invalidation markers"),
            });
        }
        Ok(key.resolve(&settings.root, settings.dot_safe_dirs))
    }

    /// Path of the invalidation marker shadowing `key`
    pub(super) fn marker_path(&self, key: &CacheKey) -> Result<PathBuf> {
        check_not_empty(key)?;

        let settings = self.inner.settings.read();
        Ok(key
            .prefixed(INVALID_PREFIX)
            .resolve(&settings.root, settings.dot_safe_dirs))
    }

    /// Take the lock on `path`; `NotFound` if the entry does not exist yet
    pub(super) fn acquire(&self, path: &Path) -> Result<FileLockGuard> {
        self.inner
            .locks
            .acquire(path)
            .map_err(|e| CacheError::io(path, "acquire entry lock", e))
    }

    /// Take the lock on `path` if the entry exists
    pub(super) fn acquire_existing(&self, path: &Path) -> Result<Option<FileLockGuard>> {
        match self.acquire(path) {
            Ok(guard) => Ok(Some(guard)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

fn check_not_empty(key: &CacheKey) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey {
            reason: "a key needs at least one component".to_string(),
        });
    }
    Ok(())
}
