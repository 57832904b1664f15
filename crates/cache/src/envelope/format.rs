//! Structured encodings that can sit inside an envelope

use crate::errors::{CacheError, Result};
use serde::{de::DeserializeOwned, Serialize};

/// A lossless structured encoding, identified by a fixed name.
///
/// The name is written into every envelope and checked on the way back, so
/// it must never change once entries have been written with it.
pub trait Format: Send + Sync + 'static {
    /// Identifier stored in the envelope header
    const NAME: &'static str;

    fn to_vec<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>>;

    fn from_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T>;
}

/// Compact binary encoding through `bincode`
#[derive(Debug, Clone, Copy, Default)]
pub struct Bincode;

impl Format for Bincode {
    const NAME: &'static str = "bincode";

    fn to_vec<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
        bincode::serialize(value).map_err(CacheError::encode)
    }

    fn from_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        bincode::deserialize(bytes).map_err(CacheError::decode)
    }
}

/// Self-describing JSON encoding through `serde_json`
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl Format for Json {
    const NAME: &'static str = "serde_json";

    fn to_vec<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(value).map_err(CacheError::encode)
    }

    fn from_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        serde_json::from_slice(bytes).map_err(CacheError::decode)
    }
}
