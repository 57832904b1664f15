//! Raw entry file access: open, create, delete

use crate::envelope::Format;
use crate::errors::{CacheError, Result};
use crate::keys::CacheKey;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use tracing::debug;

use super::super::types::CacheDir;

impl<F: Format> CacheDir<F> {
    /// Open the file backing `key` for reading
    pub fn open(&self, key: impl Into<CacheKey>) -> Result<File> {
        let path = self.resolve(&key.into())?;
        File::open(&path).map_err(|e| CacheError::io(&path, "open cache entry", e))
    }

    /// Open the file backing `key` with explicit options.
    ///
    /// Permission bits of created files follow the process umask.
    pub fn open_with(&self, options: &OpenOptions, key: impl Into<CacheKey>) -> Result<File> {
        let path = self.resolve(&key.into())?;
        options
            .open(&path)
            .map_err(|e| CacheError::io(&path, "open cache entry", e))
    }

    /// Create (or truncate) the file backing `key`, with its directories
    pub fn create(&self, key: impl Into<CacheKey>) -> Result<File> {
        let path = self.resolve(&key.into())?;
        create_entry(&path)
    }

    /// Remove the file backing `key`
    pub fn delete(&self, key: impl Into<CacheKey>) -> Result<()> {
        let path = self.resolve(&key.into())?;
        self.delete_path(&path)
    }

    pub(in crate::core) fn delete_path(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).map_err(|e| CacheError::io(path, "delete cache entry", e))?;
        debug!(path = %path.display(), "deleted cache entry");
        Ok(())
    }

    /// Remove `key` and every subkey below it; a missing key is not an error
    pub fn delete_all(&self, key: impl Into<CacheKey>) -> Result<()> {
        let path = self.resolve(&key.into())?;

        let result = match fs::symlink_metadata(&path) {
            Ok(metadata) if metadata.is_dir() => fs::remove_dir_all(&path),
            Ok(_) => fs::remove_file(&path),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                debug!(path = %path.display(), "deleted cache subtree");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::io(&path, "delete cache subtree", e)),
        }
    }
}

/// Create the parent directories of `path`, then create or truncate it
pub(super) fn create_entry(path: &Path) -> Result<File> {
    create_parent(path)?;
    File::create(path).map_err(|e| CacheError::io(path, "create cache entry", e))
}

pub(super) fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) => fs::create_dir_all(parent)
            .map_err(|e| CacheError::io(parent, "create cache directory", e)),
        None => Ok(()),
    }
}
