//! Error handling for the cache
//!
//! Every fallible operation returns [`CacheError`]. `NotFound` is the one
//! condition several operations recover from locally (set, touch, the
//! invalidation checks); everything else is surfaced unchanged.

mod conversions;
mod recovery;
mod types;

pub use types::*;
