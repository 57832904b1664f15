//! Shared filesystem utilities for fscache
//!
//! This crate holds the pieces of the cache that talk to the operating
//! system directly: advisory file locks and modification-time handling,
//! plus the tracing setup used by the cache's tests.

pub mod file_lock;
pub mod file_times;
pub mod tracing;

pub use file_lock::{
    advisory_locks_supported, AdvisoryLocks, FileLockGuard, LockProvider, LockingMode, NoopLocks,
};
