//! Cache construction and runtime configuration

use crate::config::{validate_compression_level, CacheDirConfig};
use crate::envelope::{Bincode, Envelope, Format};
use crate::errors::{CacheError, Result};
use fscache_utils::{LockProvider, LockingMode};
use parking_lot::RwLock;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::types::{CacheDir, CacheDirInner, Settings};

impl CacheDir {
    /// Create (or open) a cache rooted at `root` with default settings
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        Self::with_config(CacheDirConfig::new(root))
    }

    /// Start configuring a cache
    pub fn builder() -> CacheDirBuilder {
        CacheDirBuilder::default()
    }
}

impl<F: Format> CacheDir<F> {
    /// Create (or open) a cache from a full configuration
    pub fn with_config(config: CacheDirConfig) -> Result<Self> {
        let locks = <dyn LockProvider>::for_mode(config.locking);
        Self::from_parts(config, locks)
    }

    fn from_parts(config: CacheDirConfig, locks: Arc<dyn LockProvider>) -> Result<Self> {
        config.validate()?;
        create_root(&config.root)?;

        debug!(
            root = %config.root.display(),
            format = F::NAME,
            exclusive_locks = locks.is_exclusive(),
            "opened cache directory"
        );

        Ok(Self {
            inner: Arc::new(CacheDirInner {
                settings: RwLock::new(Settings {
                    root: config.root,
                    compression_level: config.compression_level,
                    dot_safe_dirs: config.dot_safe_dirs,
                }),
                locks,
            }),
            format: PhantomData,
        })
    }

    /// The directory backing this cache
    pub fn root(&self) -> PathBuf {
        self.inner.settings.read().root.clone()
    }

    /// Move the cache to another directory.
    ///
    /// The directory is created first; if that fails the cache keeps its
    /// current root. Existing entries are not moved.
    pub fn set_root(&self, root: impl Into<PathBuf>) -> Result<()> {
        let root = root.into();
        if root.as_os_str().is_empty() {
            return Err(CacheError::configuration("cache root must not be empty"));
        }

        let mut settings = self.inner.settings.write();
        create_root(&root)?;
        debug!(from = %settings.root.display(), to = %root.display(), "changed cache root");
        settings.root = root;
        Ok(())
    }

    /// gzip level used for new entries
    pub fn compression_level(&self) -> u32 {
        self.inner.settings.read().compression_level
    }

    pub fn set_compression_level(&self, level: u32) -> Result<()> {
        validate_compression_level(level)?;
        self.inner.settings.write().compression_level = level;
        Ok(())
    }

    /// Whether entries are protected by real locks
    pub fn has_exclusive_locks(&self) -> bool {
        self.inner.locks.is_exclusive()
    }

    pub(super) fn envelope(&self) -> Envelope<F> {
        Envelope::new(self.compression_level())
    }
}

fn create_root(root: &Path) -> Result<()> {
    fs::create_dir_all(root).map_err(|e| CacheError::io(root, "create cache directory", e))
}

/// Step-by-step construction of a [`CacheDir`]
#[derive(Debug)]
pub struct CacheDirBuilder<F = Bincode> {
    config: CacheDirConfig,
    locks: Option<Arc<dyn LockProvider>>,
    format: PhantomData<fn() -> F>,
}

impl Default for CacheDirBuilder {
    fn default() -> Self {
        Self {
            config: CacheDirConfig::default(),
            locks: None,
            format: PhantomData,
        }
    }
}

impl<F: Format> CacheDirBuilder<F> {
    /// Replace every setting with `config`
    pub fn config(mut self, config: CacheDirConfig) -> Self {
        self.config = config;
        self
    }

    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root = root.into();
        self
    }

    pub fn compression_level(mut self, level: u32) -> Self {
        self.config.compression_level = level;
        self
    }

    pub fn dot_safe_dirs(mut self, enabled: bool) -> Self {
        self.config.dot_safe_dirs = enabled;
        self
    }

    pub fn locking(mut self, mode: LockingMode) -> Self {
        self.config.locking = mode;
        self
    }

    /// Use a custom lock provider, overriding the locking mode
    pub fn lock_provider(mut self, locks: Arc<dyn LockProvider>) -> Self {
        self.locks = Some(locks);
        self
    }

    /// Store values with another structured encoding
    pub fn format<G: Format>(self) -> CacheDirBuilder<G> {
        CacheDirBuilder {
            config: self.config,
            locks: self.locks,
            format: PhantomData,
        }
    }

    pub fn build(self) -> Result<CacheDir<F>> {
        let locks = match self.locks {
            Some(locks) => locks,
            None => <dyn LockProvider>::for_mode(self.config.locking),
        };
        CacheDir::<F>::from_parts(self.config, locks)
    }
}
