//! Per-path advisory locking for cache entries
//!
//! Locks are taken on the entry file itself, so the file has to exist before
//! it can be locked. Acquiring a lock on a missing path fails with
//! [`io::ErrorKind::NotFound`]; callers treat that as "nothing to protect
//! yet" and create the entry first.
//!
//! Platforms without reliable advisory locks get [`NoopLocks`], whose guards
//! provide no exclusivity at all.

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Selects how a cache store protects its entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockingMode {
    /// Use advisory locks where the platform supports them
    #[default]
    Auto,
    /// Always use advisory locks
    Advisory,
    /// Never lock
    Disabled,
}

/// Whether this platform has advisory file locks that can be relied on.
///
/// Windows locks are mandatory and byte-range based, which would block the
/// reads and writes of the lock holder's own peers.
pub fn advisory_locks_supported() -> bool {
    !cfg!(windows)
}

/// Source of path-scoped locks
pub trait LockProvider: fmt::Debug + Send + Sync {
    /// Block until the lock for `path` is held by the caller
    fn acquire(&self, path: &Path) -> io::Result<FileLockGuard>;

    /// Whether guards from this provider actually exclude other holders
    fn is_exclusive(&self) -> bool;
}

impl dyn LockProvider {
    /// Pick the provider for the running platform
    pub fn detect() -> Arc<dyn LockProvider> {
        Self::for_mode(LockingMode::Auto)
    }

    /// Pick the provider for an explicit locking mode
    pub fn for_mode(mode: LockingMode) -> Arc<dyn LockProvider> {
        match mode {
            LockingMode::Auto if advisory_locks_supported() => Arc::new(AdvisoryLocks),
            LockingMode::Advisory => Arc::new(AdvisoryLocks),
            LockingMode::Auto | LockingMode::Disabled => Arc::new(NoopLocks),
        }
    }
}

/// Exclusive `flock`-style locks through `fs2`
#[derive(Debug, Clone, Copy, Default)]
pub struct AdvisoryLocks;

impl LockProvider for AdvisoryLocks {
    fn acquire(&self, path: &Path) -> io::Result<FileLockGuard> {
        // Opening read-only works for both files and directories
        let file = File::open(path)?;
        file.lock_exclusive()?;

        tracing::trace!(path = %path.display(), "acquired advisory lock");
        Ok(FileLockGuard {
            file: Some(file),
            path: path.to_path_buf(),
        })
    }

    fn is_exclusive(&self) -> bool {
        true
    }
}

/// Locks that always succeed and never exclude anyone
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLocks;

impl LockProvider for NoopLocks {
    fn acquire(&self, path: &Path) -> io::Result<FileLockGuard> {
        Ok(FileLockGuard {
            file: None,
            path: path.to_path_buf(),
        })
    }

    fn is_exclusive(&self) -> bool {
        false
    }
}

/// A held lock; released on drop
#[derive(Debug)]
pub struct FileLockGuard {
    file: Option<File>,
    path: PathBuf,
}

impl FileLockGuard {
    /// The path this guard protects
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this guard holds a real OS lock
    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }

    /// Release the lock now, reporting any unlock failure
    pub fn release(mut self) -> io::Result<()> {
        match self.file.take() {
            Some(file) => FileExt::unlock(&file),
            None => Ok(()),
        }
    }
}

impl Drop for FileLockGuard {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            if let Err(e) = FileExt::unlock(&file) {
                tracing::debug!(path = %self.path.display(), error = %e, "failed to unlock");
            }
        }
    }
}
