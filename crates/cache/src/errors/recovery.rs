//! Classification helpers for callers deciding how to react to an error

use super::types::CacheError;

impl CacheError {
    /// The entry (or its parent) does not exist
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The entry was written with a different encoding
    #[must_use]
    pub const fn is_format_mismatch(&self) -> bool {
        matches!(self, Self::FormatMismatch { .. })
    }

    /// The entry exists but its contents cannot be turned back into a value.
    ///
    /// Deleting the entry and recomputing the value is the usual remedy.
    #[must_use]
    pub const fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::FormatMismatch { .. }
                | Self::Compression { .. }
                | Self::Serialization {
                    operation: super::types::SerializationOp::Decode,
                    ..
                }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let mismatch = CacheError::FormatMismatch {
            expected: "bincode",
            found: "encoding/gob".to_string(),
        };
        assert!(mismatch.is_format_mismatch());
        assert!(mismatch.is_corruption());
        assert!(!mismatch.is_not_found());

        assert!(CacheError::decode("bad").is_corruption());
        assert!(!CacheError::encode("bad").is_corruption());
        assert!(!CacheError::configuration("bad").is_corruption());
    }
}
