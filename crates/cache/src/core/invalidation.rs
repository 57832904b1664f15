//! Invalidation markers
//!
//! Marking a key invalid deletes its entry and touches a shadow entry under
//! the [`INVALID_PREFIX`] subtree. For as long as the marker is younger than
//! the caller's window the key reports invalid; older markers are removed the
//! next time they are checked.
//!
//! Callers cannot address the marker subtree with their own keys, so a marker
//! never shares a file with a cached value.

use crate::envelope::Format;
use crate::errors::Result;
use crate::keys::CacheKey;
use fscache_utils::file_times;
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

use super::types::CacheDir;

/// Reserved first key component of every invalidation marker
pub const INVALID_PREFIX: &str = ".invalid";

impl<F: Format> CacheDir<F> {
    /// When `key` was marked invalid, or `None` if it is not marked
    pub fn get_invalid(&self, key: impl Into<CacheKey>) -> Option<SystemTime> {
        let key = key.into();
        match self
            .marker_path(&key)
            .and_then(|marker| self.stat_path(&marker))
        {
            Ok(info) => Some(info.modified()),
            Err(e) if e.is_not_found() => None,
            Err(e) => {
                warn!(%key, error = %e, "could not read invalidation marker");
                None
            }
        }
    }

    /// Whether `key` is usable: it is not marked invalid, or was marked more
    /// than `max_age` ago. Expired markers are removed.
    pub fn is_valid(&self, key: impl Into<CacheKey>, max_age: Duration) -> bool {
        let key = key.into();
        let Some(marked) = self.get_invalid(&key) else {
            return true;
        };

        if file_times::age(marked) <= max_age {
            return false;
        }

        if let Err(e) = self.unset_invalid(&key) {
            if !e.is_not_found() {
                warn!(%key, error = %e, "could not remove expired invalidation marker");
            }
        }
        true
    }

    /// Delete the entry for `key` and mark the key invalid as of now.
    ///
    /// A missing entry is fine; any other failure to delete it is returned
    /// and the key is left unmarked.
    pub fn set_invalid(&self, key: impl Into<CacheKey>) -> Result<()> {
        let key = key.into();

        match self.delete(&key) {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        let marker = self.marker_path(&key)?;
        self.touch_path(&marker)?;
        debug!(%key, "marked cache key invalid");
        Ok(())
    }

    /// Remove the invalidation marker for `key`
    pub fn unset_invalid(&self, key: impl Into<CacheKey>) -> Result<()> {
        let marker = self.marker_path(&key.into())?;
        self.delete_path(&marker)
    }
}
