//! The filesystem-backed cache store
//!
//! Every operation resolves its key to a path, takes the entry's lock for
//! as short a time as possible and does blocking I/O on the caller's thread.
//! Encoding happens before a write takes the lock and decoding after a read
//! has released it, so the lock brackets exactly the byte copy.
//!
//! Only the store's settings sit behind a store-wide lock; entries are
//! protected individually, so different keys never contend.

mod builder;
mod invalidation;
mod operations;
mod paths;
mod types;

pub use builder::CacheDirBuilder;
pub use invalidation::INVALID_PREFIX;
pub use types::{CacheDir, EntryInfo, Expiring};

#[cfg(test)]
mod tests;
