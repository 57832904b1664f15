//! Detection of values that carry nothing worth caching
//!
//! `None` and `()` (also behind a `Box` or a newtype struct) are
//! never written. The probe is a serializer that stops at the first token.

use serde::ser::{self, Impossible, Serialize, Serializer};
use std::fmt;

/// Whether `value` serializes as `None` or `()`
pub fn is_nil<T: Serialize + ?Sized>(value: &T) -> bool {
    value.serialize(NilProbe).unwrap_or(false)
}

struct NilProbe;

/// Raised for every compound value; those are never nil
#[derive(Debug)]
struct NotNil;

impl fmt::Display for NotNil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("value is not nil")
    }
}

impl std::error::Error for NotNil {}

impl ser::Error for NotNil {
    fn custom<T: fmt::Display>(_msg: T) -> Self {
        NotNil
    }
}

impl Serializer for NilProbe {
    type Ok = bool;
    type Error = NotNil;

    type SerializeSeq = Impossible<bool, NotNil>;
    type SerializeTuple = Impossible<bool, NotNil>;
    type SerializeTupleStruct = Impossible<bool, NotNil>;
    type SerializeTupleVariant = Impossible<bool, NotNil>;
    type SerializeMap = Impossible<bool, NotNil>;
    type SerializeStruct = Impossible<bool, NotNil>;
    type SerializeStructVariant = Impossible<bool, NotNil>;

    fn serialize_bool(self, _v: bool) -> Result<bool, NotNil> {
        Ok(false)
    }

    fn serialize_i8(self, _v: i8) -> Result<bool, NotNil> {
        Ok(false)
    }

    fn serialize_i16(self, _v: i16) -> Result<bool, NotNil> {
        Ok(false)
    }

    fn serialize_i32(self, _v: i32) -> Result<bool, NotNil> {
        Ok(false)
    }

    fn serialize_i64(self, _v: i64) -> Result<bool, NotNil> {
        Ok(false)
    }

    fn serialize_u8(self, _v: u8) -> Result<bool, NotNil> {
        Ok(false)
    }

    fn serialize_u16(self, _v: u16) -> Result<bool, NotNil> {
        Ok(false)
    }

    fn serialize_u32(self, _v: u32) -> Result<bool, NotNil> {
        Ok(false)
    }

    fn serialize_u64(self, _v: u64) -> Result<bool, NotNil> {
        Ok(false)
    }

    fn serialize_f32(self, _v: f32) -> Result<bool, NotNil> {
        Ok(false)
    }

    fn serialize_f64(self, _v: f64) -> Result<bool, NotNil> {
        Ok(false)
    }

    fn serialize_char(self, _v: char) -> Result<bool, NotNil> {
        Ok(false)
    }

    fn serialize_str(self, _v: &str) -> Result<bool, NotNil> {
        Ok(false)
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<bool, NotNil> {
        Ok(false)
    }

    fn serialize_none(self) -> Result<bool, NotNil> {
        Ok(true)
    }

    fn serialize_some<T>(self, _value: &T) -> Result<bool, NotNil>
    where
        T: ?Sized + Serialize,
    {
        Ok(false)
    }

    fn serialize_unit(self) -> Result<bool, NotNil> {
        Ok(true)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<bool, NotNil> {
        Ok(false)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<bool, NotNil> {
        Ok(false)
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<bool, NotNil>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<bool, NotNil>
    where
        T: ?Sized + Serialize,
    {
        Ok(false)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, NotNil> {
        Err(NotNil)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, NotNil> {
        Err(NotNil)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, NotNil> {
        Err(NotNil)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, NotNil> {
        Err(NotNil)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, NotNil> {
        Err(NotNil)
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, NotNil> {
        Err(NotNil)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, NotNil> {
        Err(NotNil)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(serde::Serialize)]
    struct Wrapper(Option<u8>);

    #[derive(serde::Serialize)]
    struct Marker;

    #[test]
    fn test_nil_values() {
        assert!(is_nil(&None::<u64>));
        assert!(is_nil(&()));
        assert!(is_nil(&Box::new(None::<String>)));
        assert!(is_nil(&Wrapper(None)));
    }

    #[test]
    fn test_non_nil_values() {
        assert!(!is_nil(&42));
        assert!(!is_nil(&Some(0)));
        assert!(!is_nil(&Some(None::<u8>)));
        assert!(!is_nil(""));
        assert!(!is_nil(&Vec::<u8>::new()));
        assert!(!is_nil(&HashMap::<String, u8>::new()));
        assert!(!is_nil(&Marker));
        assert!(!is_nil(&(1, 2)));
    }
}
