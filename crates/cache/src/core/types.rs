//! Core cache types and structures

use crate::envelope::Bincode;
use fscache_utils::LockProvider;
use parking_lot::RwLock;
use std::fs::Metadata;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

/// A cache backed by a directory tree.
///
/// Cloning is cheap and yields a handle to the same store. `F` is the
/// structured encoding used for stored values.
pub struct CacheDir<F = Bincode> {
    pub(super) inner: Arc<CacheDirInner>,
    pub(super) format: PhantomData<fn() -> F>,
}

pub(super) struct CacheDirInner {
    /// Reconfigurable settings; never held across entry I/O
    pub settings: RwLock<Settings>,
    /// Source of per-entry locks
    pub locks: Arc<dyn LockProvider>,
}

#[derive(Debug, Clone)]
pub(super) struct Settings {
    pub root: PathBuf,
    pub compression_level: u32,
    pub dot_safe_dirs: bool,
}

impl<F> Clone for CacheDir<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            format: PhantomData,
        }
    }
}

impl<F: crate::envelope::Format> std::fmt::Debug for CacheDir<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let settings = self.inner.settings.read();
        f.debug_struct("CacheDir")
            .field("root", &settings.root)
            .field("compression_level", &settings.compression_level)
            .field("format", &F::NAME)
            .field("locks", &self.inner.locks)
            .finish()
    }
}

/// Filesystem metadata of one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    name: String,
    len: u64,
    modified: SystemTime,
    is_dir: bool,
}

impl EntryInfo {
    pub(super) fn new(name: String, metadata: &Metadata) -> std::io::Result<Self> {
        Ok(Self {
            name,
            len: metadata.len(),
            modified: metadata.modified()?,
            is_dir: metadata.is_dir(),
        })
    }

    /// File name of the entry on disk, after key filtering
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size in bytes; zero for touched placeholders
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    /// Whether the key has subkeys rather than a value
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }
}

/// Outcome of [`CacheDir::get_and_expire`]
#[derive(Debug, Clone, PartialEq)]
pub struct Expiring<T> {
    /// The cached value, if it could be read
    pub value: Option<T>,
    /// Modification time of the entry, if it was read
    pub modified: Option<SystemTime>,
    /// The unreadable entry was old enough and has been removed
    pub expired: bool,
}
