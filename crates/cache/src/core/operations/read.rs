//! Reading values back out of the cache

use crate::envelope::Format;
use crate::errors::{CacheError, Result};
use crate::keys::CacheKey;
use fscache_utils::{file_times, FileLockGuard};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{debug, trace};

use super::super::types::{CacheDir, Expiring};

/// An entry opened under its lock, with its metadata
struct LockedEntry {
    file: File,
    lock: FileLockGuard,
    len: u64,
    modified: SystemTime,
}

impl LockedEntry {
    /// Copy the entry's bytes, then release the lock
    fn into_bytes(self, path: &Path) -> Result<Vec<u8>> {
        let LockedEntry {
            mut file, lock, len, ..
        } = self;

        let mut bytes = Vec::with_capacity(usize::try_from(len).unwrap_or(0));
        file.read_to_end(&mut bytes)
            .map_err(|e| CacheError::io(path, "read cache entry", e))?;
        drop(file);

        lock.release()
            .map_err(|e| CacheError::io(path, "release entry lock", e))?;

        trace!(path = %path.display(), len = bytes.len(), "read cache entry");
        Ok(bytes)
    }
}

impl<F: Format> CacheDir<F> {
    /// Read and decode the value stored at `key`, with the entry's mtime
    pub fn get<T: DeserializeOwned>(&self, key: impl Into<CacheKey>) -> Result<(T, SystemTime)> {
        let path = self.resolve(&key.into())?;
        let entry = self.open_locked(&path)?;
        let modified = entry.modified;
        let bytes = entry.into_bytes(&path)?;

        // The bytes are ours now; decoding does not need the lock
        let value = self.envelope().decode(&bytes)?;
        Ok((value, modified))
    }

    /// Like [`get`](Self::get), but decodes into `dst`.
    ///
    /// `dst` is only written when the whole read succeeded.
    pub fn get_into<T: DeserializeOwned>(
        &self,
        dst: &mut T,
        key: impl Into<CacheKey>,
    ) -> Result<SystemTime> {
        let (value, modified) = self.get(key)?;
        *dst = value;
        Ok(modified)
    }

    /// Read `key`, removing the entry if it cannot be read and is older
    /// than `max_age`.
    ///
    /// Readable entries are returned whatever their age. The age comes from
    /// the entry's mtime once it was opened; when it could not even be
    /// opened the age is measured from the Unix epoch, so the (likely absent)
    /// entry counts as expired and is deleted. A missing entry is fine at
    /// that point.
    pub fn get_and_expire<T: DeserializeOwned>(
        &self,
        key: impl Into<CacheKey>,
        max_age: Duration,
    ) -> Result<Expiring<T>> {
        let path = self.resolve(&key.into())?;

        let (modified, error) = match self.open_locked(&path) {
            Ok(entry) => {
                let modified = entry.modified;
                match entry
                    .into_bytes(&path)
                    .and_then(|bytes| self.envelope().decode(&bytes))
                {
                    Ok(value) => {
                        return Ok(Expiring {
                            value: Some(value),
                            modified: Some(modified),
                            expired: false,
                        })
                    }
                    Err(e) => (Some(modified), e),
                }
            }
            Err(e) => (None, e),
        };

        if file_times::age(modified.unwrap_or(SystemTime::UNIX_EPOCH)) <= max_age {
            return Err(error);
        }

        debug!(path = %path.display(), %error, "expiring unreadable cache entry");
        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(CacheError::io(&path, "delete expired cache entry", e)),
        }

        Ok(Expiring {
            value: None,
            modified,
            expired: true,
        })
    }

    /// Lock and open an entry, reading its size and mtime
    fn open_locked(&self, path: &Path) -> Result<LockedEntry> {
        let lock = self.acquire(path)?;

        let file = File::open(path).map_err(|e| CacheError::io(path, "open cache entry", e))?;
        let metadata = file
            .metadata()
            .map_err(|e| CacheError::io(path, "stat cache entry", e))?;
        let modified = metadata
            .modified()
            .map_err(|e| CacheError::io(path, "read entry mtime", e))?;

        Ok(LockedEntry {
            file,
            lock,
            len: metadata.len(),
            modified,
        })
    }
}
