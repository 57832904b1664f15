//! Entry metadata: stat, touch, modification times and explicit locking

use crate::envelope::Format;
use crate::errors::{CacheError, Result};
use crate::keys::CacheKey;
use fscache_utils::{file_times, FileLockGuard};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::time::SystemTime;
use tracing::trace;

use super::super::types::{CacheDir, EntryInfo};
use super::files::create_parent;

impl<F: Format> CacheDir<F> {
    /// Lock the entry backing `key` until the guard is dropped.
    ///
    /// Fails with `NotFound` if the entry does not exist yet. While the
    /// guard is held, use only the `*_no_lock` operations on the same key.
    pub fn lock(&self, key: impl Into<CacheKey>) -> Result<FileLockGuard> {
        let path = self.resolve(&key.into())?;
        self.acquire(&path)
    }

    /// Filesystem metadata of the file or directory backing `key`
    pub fn stat(&self, key: impl Into<CacheKey>) -> Result<EntryInfo> {
        let path = self.resolve(&key.into())?;
        self.stat_path(&path)
    }

    /// Set the mtime of `key` to now, creating an empty entry if needed.
    ///
    /// Existing contents are never modified.
    pub fn touch(&self, key: impl Into<CacheKey>) -> Result<()> {
        let path = self.resolve(&key.into())?;
        self.touch_path(&path)
    }

    pub(in crate::core) fn stat_path(&self, path: &Path) -> Result<EntryInfo> {
        let _lock = self.acquire(path)?;

        let metadata =
            fs::metadata(path).map_err(|e| CacheError::io(path, "stat cache entry", e))?;

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        EntryInfo::new(name, &metadata).map_err(|e| CacheError::io(path, "read entry mtime", e))
    }

    pub(in crate::core) fn touch_path(&self, path: &Path) -> Result<()> {
        let _lock = self.acquire_existing(path)?;

        match set_mtime(path, SystemTime::now()) {
            Ok(()) => return Ok(()),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        create_parent(path)?;
        OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .map_err(|e| CacheError::io(path, "create cache entry", e))?;

        trace!(path = %path.display(), "created empty cache entry");
        Ok(())
    }

    /// Set the mtime of `key`
    pub fn chtime(&self, key: impl Into<CacheKey>, mtime: SystemTime) -> Result<()> {
        let path = self.resolve(&key.into())?;
        let _lock = self.acquire(&path)?;
        set_mtime(&path, mtime)
    }

    /// Set the mtime of `key` without locking it.
    ///
    /// Only for callers already holding the entry's lock (see [`lock`](Self::lock)).
    pub fn chtime_no_lock(&self, key: impl Into<CacheKey>, mtime: SystemTime) -> Result<()> {
        let path = self.resolve(&key.into())?;
        set_mtime(&path, mtime)
    }
}

fn set_mtime(path: &Path, mtime: SystemTime) -> Result<()> {
    file_times::set_modified(path, mtime).map_err(|e| CacheError::io(path, "set entry mtime", e))
}
