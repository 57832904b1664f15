//! The on-disk representation of cached values
//!
//! A value is encoded with a structured [`Format`], then gzip-compressed.
//! The format's name goes into the gzip header's comment field, so a reader
//! learns how the payload was encoded before decompressing any of it, and
//! rejects entries written in any other format.

mod format;
mod nil;

pub use format::{Bincode, Format, Json};
pub use nil::is_nil;

use crate::errors::{CacheError, Result};
use flate2::bufread::GzDecoder;
use flate2::{Compression, GzBuilder};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::io::{self, Read, Write};
use std::marker::PhantomData;

/// Default gzip level: best compression
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 9;

/// Highest level gzip accepts
pub const MAX_COMPRESSION_LEVEL: u32 = 9;

/// Encoder/decoder pairing a structured format with gzip
pub struct Envelope<F = Bincode> {
    level: u32,
    format: PhantomData<fn() -> F>,
}

impl<F> Clone for Envelope<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F> Copy for Envelope<F> {}

impl<F: Format> fmt::Debug for Envelope<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("format", &F::NAME)
            .field("level", &self.level)
            .finish()
    }
}

impl<F: Format> Default for Envelope<F> {
    fn default() -> Self {
        Self::new(DEFAULT_COMPRESSION_LEVEL)
    }
}

impl<F: Format> Envelope<F> {
    /// Envelope compressing at `level` (clamped to 0-9)
    pub fn new(level: u32) -> Self {
        Self {
            level: level.min(MAX_COMPRESSION_LEVEL),
            format: PhantomData,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Encode `value` fully in memory.
    ///
    /// Returns `None` for nil values (see [`is_nil`]): storing nothing means
    /// leaving the cache alone.
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Option<Vec<u8>>> {
        if is_nil(value) {
            return Ok(None);
        }

        let payload = F::to_vec(value)?;

        let mut gz = GzBuilder::new()
            .comment(F::NAME)
            .write(Vec::new(), Compression::new(self.level));
        gz.write_all(&payload).map_err(compression("compress cache value"))?;
        let bytes = gz.finish().map_err(compression("finish gzip stream"))?;

        Ok(Some(bytes))
    }

    /// Check the envelope's format tag and decode the payload
    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        let mut gz = GzDecoder::new(bytes);

        let found = match gz.header() {
            Some(header) => header
                .comment()
                .map(|comment| String::from_utf8_lossy(comment).into_owned())
                .unwrap_or_default(),
            None => return Err(Self::header_error(&mut gz, bytes)),
        };

        if found != F::NAME {
            return Err(CacheError::FormatMismatch {
                expected: F::NAME,
                found,
            });
        }

        // Reading to the end also verifies the gzip checksum
        let mut payload = Vec::new();
        gz.read_to_end(&mut payload)
            .map_err(compression("decompress cache value"))?;

        F::from_slice(&payload)
    }

    /// Explain why no gzip header could be parsed
    fn header_error(gz: &mut GzDecoder<&[u8]>, bytes: &[u8]) -> CacheError {
        let source = if bytes.is_empty() {
            io::Error::new(io::ErrorKind::UnexpectedEof, "cache entry is empty")
        } else {
            match gz.read(&mut [0u8; 1]) {
                Err(e) => e,
                Ok(_) => io::Error::new(io::ErrorKind::InvalidData, "invalid gzip header"),
            }
        };
        CacheError::Compression {
            operation: "read gzip header",
            source,
        }
    }
}

fn compression(operation: &'static str) -> impl FnOnce(io::Error) -> CacheError {
    move |source| CacheError::Compression { operation, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Entry {
        name: String,
        hits: BTreeMap<String, u32>,
    }

    fn sample() -> Entry {
        let mut hits = BTreeMap::new();
        hits.insert("a".to_string(), 1);
        hits.insert("b".to_string(), 2);
        Entry {
            name: "sample".to_string(),
            hits,
        }
    }

    #[test]
    fn test_envelope_preserves_value() {
        let envelope = Envelope::<Bincode>::default();
        let bytes = envelope.encode(&sample()).unwrap().unwrap();
        assert_eq!(envelope.decode::<Entry>(&bytes).unwrap(), sample());
    }

    #[test]
    fn test_format_tag_lives_in_gzip_header() {
        let bytes = Envelope::<Json>::new(6).encode(&sample()).unwrap().unwrap();

        let gz = GzDecoder::new(&bytes[..]);
        let header = gz.header().unwrap();
        assert_eq!(header.comment(), Some(&b"serde_json"[..]));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let bytes = Envelope::<Json>::default().encode(&7u32).unwrap().unwrap();

        let err = Envelope::<Bincode>::default()
            .decode::<u32>(&bytes)
            .unwrap_err();
        match err {
            CacheError::FormatMismatch { expected, found } => {
                assert_eq!(expected, "bincode");
                assert_eq!(found, "serde_json");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_untagged_gzip_is_rejected() {
        let mut gz = flate2::write::GzEncoder::new(Vec::new(), Compression::default());
        gz.write_all(b"plain").unwrap();
        let bytes = gz.finish().unwrap();

        let err = Envelope::<Bincode>::default()
            .decode::<String>(&bytes)
            .unwrap_err();
        assert!(err.is_format_mismatch());
    }

    #[test]
    fn test_nil_is_not_encoded() {
        let envelope = Envelope::<Bincode>::default();
        assert!(envelope.encode(&None::<String>).unwrap().is_none());
        assert!(envelope.encode(&()).unwrap().is_none());
        assert!(envelope.encode(&Some(1)).unwrap().is_some());
    }

    #[test]
    fn test_garbage_and_empty_input() {
        let envelope = Envelope::<Bincode>::default();

        let err = envelope.decode::<u8>(b"").unwrap_err();
        assert!(matches!(err, CacheError::Compression { .. }));

        let err = envelope.decode::<u8>(b"definitely not gzip").unwrap_err();
        assert!(err.is_corruption());
    }

    #[test]
    fn test_truncated_entry_is_corruption() {
        let envelope = Envelope::<Bincode>::default();
        let bytes = envelope.encode(&"x".repeat(4096)).unwrap().unwrap();

        let err = envelope
            .decode::<String>(&bytes[..bytes.len() - 8])
            .unwrap_err();
        assert!(err.is_corruption());
    }

    #[test]
    fn test_level_is_clamped() {
        assert_eq!(Envelope::<Bincode>::new(42).level(), 9);
        let stored = Envelope::<Bincode>::new(0).encode(&1u8).unwrap().unwrap();
        assert_eq!(Envelope::<Bincode>::default().decode::<u8>(&stored).unwrap(), 1);
    }
}
