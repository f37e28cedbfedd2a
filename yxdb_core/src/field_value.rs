//! Per-[`FieldType`] value encode/decode, modeled as an open dispatch table.
//!
//! This generalizes the format's only fully-specified value codec (`Double`)
//! into an extensible [`FieldCodec`] trait so additional types can be added
//! without touching the framing layer above it. Every type besides `Double`
//! currently resolves to [`UnimplementedCodec`].

use crate::error::{Result, YxdbError};
use crate::field_type::FieldType;

/// A decoded record-field value. Only `Double` has a concrete variant today;
/// every other [`FieldType`] errors before a value of that kind could exist.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Double(Option<f64>),
}

/// Encode/decode for one [`FieldType`]'s on-disk value representation.
///
/// Implementations must follow the "fixed layout + trailing null-indicator
/// byte" convention `Double` establishes: a zero trailing byte means present,
/// non-zero means null.
pub trait FieldCodec: Send + Sync {
    /// Canonical name of the type this codec handles, for error messages.
    fn kind(&self) -> &'static str;

    /// Encode a value to its on-disk bytes.
    fn encode(&self, value: &FieldValue) -> Result<Vec<u8>>;

    /// Decode a value from its on-disk bytes, returning the value and the
    /// number of bytes consumed.
    fn decode(&self, bytes: &[u8]) -> Result<(FieldValue, usize)>;
}

/// IEEE-754 little-endian 8 bytes, followed by a one-byte null indicator
/// (`0x00` = present, non-zero = null).
pub struct DoubleCodec;

impl FieldCodec for DoubleCodec {
    fn kind(&self) -> &'static str {
        "Double"
    }

    fn encode(&self, value: &FieldValue) -> Result<Vec<u8>> {
        let FieldValue::Double(v) = value;
        let mut out = Vec::with_capacity(9);
        match v {
            Some(x) => {
                out.extend_from_slice(&x.to_le_bytes());
                out.push(0x00);
            }
            None => {
                out.extend_from_slice(&0.0f64.to_le_bytes());
                out.push(0x01);
            }
        }
        Ok(out)
    }

    fn decode(&self, bytes: &[u8]) -> Result<(FieldValue, usize)> {
        if bytes.len() < 9 {
            return Err(YxdbError::truncated(0, 9 - bytes.len(), "field.Double"));
        }
        let x = f64::from_le_bytes(bytes[0..8].try_into().unwrap());
        let null_flag = bytes[8];
        let value = if null_flag == 0 { Some(x) } else { None };
        Ok((FieldValue::Double(value), 9))
    }
}

/// Shared sentinel for every [`FieldType`] the source left unimplemented.
pub struct UnimplementedCodec(pub &'static str);

impl FieldCodec for UnimplementedCodec {
    fn kind(&self) -> &'static str {
        self.0
    }

    fn encode(&self, _value: &FieldValue) -> Result<Vec<u8>> {
        Err(YxdbError::Unimplemented { kind: self.0 })
    }

    fn decode(&self, _bytes: &[u8]) -> Result<(FieldValue, usize)> {
        Err(YxdbError::Unimplemented { kind: self.0 })
    }
}

static DOUBLE_CODEC: DoubleCodec = DoubleCodec;

static BOOL_CODEC: UnimplementedCodec = UnimplementedCodec("Bool");
static BYTE_CODEC: UnimplementedCodec = UnimplementedCodec("Byte");
static INT16_CODEC: UnimplementedCodec = UnimplementedCodec("Int16");
static INT32_CODEC: UnimplementedCodec = UnimplementedCodec("Int32");
static INT64_CODEC: UnimplementedCodec = UnimplementedCodec("Int64");
static FIXED_DECIMAL_CODEC: UnimplementedCodec = UnimplementedCodec("FixedDecimal");
static FLOAT_CODEC: UnimplementedCodec = UnimplementedCodec("Float");
static STRING_CODEC: UnimplementedCodec = UnimplementedCodec("String");
static WSTRING_CODEC: UnimplementedCodec = UnimplementedCodec("WString");
static V_STRING_CODEC: UnimplementedCodec = UnimplementedCodec("V_String");
static V_WSTRING_CODEC: UnimplementedCodec = UnimplementedCodec("V_WString");
static DATE_CODEC: UnimplementedCodec = UnimplementedCodec("Date");
static TIME_CODEC: UnimplementedCodec = UnimplementedCodec("Time");
static DATE_TIME_CODEC: UnimplementedCodec = UnimplementedCodec("DateTime");
static BLOB_CODEC: UnimplementedCodec = UnimplementedCodec("Blob");
static SPATIAL_OBJ_CODEC: UnimplementedCodec = UnimplementedCodec("SpatialObj");
static UNKNOWN_CODEC: UnimplementedCodec = UnimplementedCodec("Unknown");

/// Resolve the [`FieldCodec`] for a given [`FieldType`].
///
/// Every variant besides `Double` resolves to an [`UnimplementedCodec`]
/// carrying that type's canonical name, so callers get a precise
/// `Unimplemented(kind)` error rather than a generic one.
pub fn field_codec_for(ty: FieldType) -> &'static dyn FieldCodec {
    match ty {
        FieldType::Double => &DOUBLE_CODEC,
        FieldType::Bool => &BOOL_CODEC,
        FieldType::Byte => &BYTE_CODEC,
        FieldType::Int16 => &INT16_CODEC,
        FieldType::Int32 => &INT32_CODEC,
        FieldType::Int64 => &INT64_CODEC,
        FieldType::FixedDecimal => &FIXED_DECIMAL_CODEC,
        FieldType::Float => &FLOAT_CODEC,
        FieldType::String => &STRING_CODEC,
        FieldType::WString => &WSTRING_CODEC,
        FieldType::VString => &V_STRING_CODEC,
        FieldType::VWString => &V_WSTRING_CODEC,
        FieldType::Date => &DATE_CODEC,
        FieldType::Time => &TIME_CODEC,
        FieldType::DateTime => &DATE_TIME_CODEC,
        FieldType::Blob => &BLOB_CODEC,
        FieldType::SpatialObj => &SPATIAL_OBJ_CODEC,
        FieldType::Unknown => &UNKNOWN_CODEC,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_encode_is_nine_bytes_and_never_null() {
        let codec = field_codec_for(FieldType::Double);
        let encoded = codec.encode(&FieldValue::Double(Some(3.14))).unwrap();
        assert_eq!(encoded.len(), 9);
        assert_eq!(encoded[8], 0x00);
    }

    #[test]
    fn double_decode_is_bit_identical() {
        let codec = field_codec_for(FieldType::Double);
        let encoded = codec.encode(&FieldValue::Double(Some(3.14))).unwrap();
        let (value, consumed) = codec.decode(&encoded).unwrap();
        assert_eq!(consumed, 9);
        assert_eq!(value, FieldValue::Double(Some(3.14)));
    }

    #[test]
    fn double_preserves_nan_bit_pattern() {
        let codec = field_codec_for(FieldType::Double);
        let nan = f64::NAN;
        let encoded = codec.encode(&FieldValue::Double(Some(nan))).unwrap();
        let (value, _) = codec.decode(&encoded).unwrap();
        match value {
            FieldValue::Double(Some(x)) => assert!(x.is_nan()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unimplemented_type_errors_on_encode_and_decode() {
        let codec = field_codec_for(FieldType::String);
        let err = codec.encode(&FieldValue::Double(Some(1.0))).unwrap_err();
        assert!(matches!(err, YxdbError::Unimplemented { kind: "String" }));
        let err = codec.decode(&[]).unwrap_err();
        assert!(matches!(err, YxdbError::Unimplemented { kind: "String" }));
    }

    #[test]
    fn null_indicator_nonzero_decodes_to_none() {
        let mut bytes = 0.0f64.to_le_bytes().to_vec();
        bytes.push(0x01);
        let codec = field_codec_for(FieldType::Double);
        let (value, _) = codec.decode(&bytes).unwrap();
        assert_eq!(value, FieldValue::Double(None));
    }
}
