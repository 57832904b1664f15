//! Storing values in the cache

use crate::envelope::Format;
use crate::errors::{CacheError, Result};
use crate::keys::CacheKey;
use serde::Serialize;
use std::io::Write;
use tracing::{debug, trace};

use super::super::types::CacheDir;
use super::files::create_entry;

impl<F: Format> CacheDir<F> {
    /// Store `value` at `key`, returning the size of the written entry.
    ///
    /// The value is encoded in memory first, so a failed encode never leaves
    /// a truncated entry behind. Nil values (`None`, `()`) are not stored and
    /// report zero bytes.
    pub fn set<T: Serialize + ?Sized>(&self, key: impl Into<CacheKey>, value: &T) -> Result<u64> {
        let path = self.resolve(&key.into())?;

        let Some(bytes) = self.envelope().encode(value)? else {
            trace!(path = %path.display(), "nil value, cache left untouched");
            return Ok(0);
        };

        let existing = self.acquire_existing(&path)?;
        let mut file = create_entry(&path)?;
        // Some lock primitives need the file to exist, so a new entry is
        // only locked once it has been created
        let _lock = match existing {
            Some(guard) => guard,
            None => self.acquire(&path)?,
        };

        file.write_all(&bytes)
            .map_err(|e| CacheError::io(&path, "write cache entry", e))?;
        drop(file);

        debug!(path = %path.display(), len = bytes.len(), "stored cache entry");
        Ok(bytes.len() as u64)
    }
}
