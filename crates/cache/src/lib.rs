//! Filesystem-backed key/value cache
//!
//! This crate maps hierarchical keys onto files below a root directory:
//! - Keys are sequences of displayable components, filtered into paths that
//!   are legal on every platform
//! - Values are encoded with serde, gzip-compressed and tagged with their
//!   encoding
//! - Entries are locked individually with advisory file locks, so several
//!   processes can share one cache directory
//! - Entry mtimes serve as freshness metadata and drive invalidation markers
//!
//! ```no_run
//! use fscache::CacheDir;
//! use std::time::Duration;
//!
//! # fn main() -> fscache::Result<()> {
//! let cache = CacheDir::new("/tmp/my-cache")?;
//! cache.set(["users", "42"], &"alice".to_string())?;
//!
//! let (name, _stored_at) = cache.get::<String>(["users", "42"])?;
//! assert_eq!(name, "alice");
//!
//! cache.set_invalid(["users", "42"])?;
//! assert!(!cache.is_valid(["users", "42"], Duration::from_secs(60)));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod envelope;
pub mod errors;
pub mod keys;

pub use config::CacheDirConfig;
pub use core::{CacheDir, CacheDirBuilder, EntryInfo, Expiring, INVALID_PREFIX};
pub use envelope::{Bincode, Envelope, Format, Json};
pub use errors::{CacheError, Error, Result};
pub use keys::CacheKey;

pub use fscache_utils::{FileLockGuard, LockProvider, LockingMode};
