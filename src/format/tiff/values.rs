//! TIFF tag value decoding.
//!
//! Turns the raw value bytes of an IFD entry into typed values. Decoding is a
//! pure function of (type, count, bytes, byte order): the IFD reader is
//! responsible for finding the bytes, inline or at an offset.
//!
//! Rationals are emitted as two integers per element (numerator, then
//! denominator). The decoder never divides, so a zero denominator is just data.

use std::fmt;

use bytes::Bytes;
use serde::{Serialize, Serializer};

use super::parser::ByteOrder;
use super::tags::FieldType;

// =============================================================================
// TiffValue
// =============================================================================

/// A single decoded element of a directory entry.
///
/// Small integer types are widened to 32 bits; the 64-bit BigTIFF types keep
/// their width.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TiffValue {
    /// BYTE, SHORT, LONG, IFD, or one half of a RATIONAL
    Unsigned(u32),
    /// SBYTE, SSHORT, SLONG, or one half of an SRATIONAL
    Signed(i32),
    /// LONG8, IFD8
    Unsigned64(u64),
    /// SLONG8
    Signed64(i64),
    Float(f32),
    Double(f64),
    /// One NUL-terminated segment of an ASCII entry, terminator removed
    Ascii(String),
    /// The whole payload of an UNDEFINED entry
    Undefined(#[serde(serialize_with = "serialize_hex")] Bytes),
}

fn serialize_hex<S: Serializer>(bytes: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

impl TiffValue {
    /// Integer value widened to u64, if this is a non-negative integer.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            TiffValue::Unsigned(v) => Some(v as u64),
            TiffValue::Unsigned64(v) => Some(v),
            TiffValue::Signed(v) => u64::try_from(v).ok(),
            TiffValue::Signed64(v) => u64::try_from(v).ok(),
            _ => None,
        }
    }

    /// Integer value widened to i64, if this is an integer that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            TiffValue::Unsigned(v) => Some(v as i64),
            TiffValue::Signed(v) => Some(v as i64),
            TiffValue::Signed64(v) => Some(v),
            TiffValue::Unsigned64(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    /// The string, for ASCII segments.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TiffValue::Ascii(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for TiffValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TiffValue::Unsigned(v) => write!(f, "{}", v),
            TiffValue::Signed(v) => write!(f, "{}", v),
            TiffValue::Unsigned64(v) => write!(f, "{}", v),
            TiffValue::Signed64(v) => write!(f, "{}", v),
            TiffValue::Float(v) => write!(f, "{}", v),
            TiffValue::Double(v) => write!(f, "{}", v),
            TiffValue::Ascii(s) => f.write_str(s),
            TiffValue::Undefined(bytes) => f.write_str(&hex::encode(bytes)),
        }
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode `count` elements of `field_type` from `bytes`.
///
/// `bytes` should hold exactly `count * field_type.size_in_bytes()` bytes.
/// If it holds fewer, only the complete elements are decoded.
pub fn decode_values(
    field_type: FieldType,
    count: u64,
    bytes: &[u8],
    byte_order: ByteOrder,
) -> Vec<TiffValue> {
    let size = field_type.size_in_bytes();
    let available = (bytes.len() / size) as u64;
    let count = count.min(available) as usize;
    let bytes = &bytes[..count * size];

    match field_type {
        FieldType::Ascii => split_ascii(bytes),
        FieldType::Undefined => vec![TiffValue::Undefined(Bytes::copy_from_slice(bytes))],
        FieldType::Byte => bytes.iter().map(|&b| TiffValue::Unsigned(b as u32)).collect(),
        FieldType::SByte => bytes
            .iter()
            .map(|&b| TiffValue::Signed(b as i8 as i32))
            .collect(),
        FieldType::Short => bytes
            .chunks_exact(2)
            .map(|c| TiffValue::Unsigned(byte_order.read_u16(c) as u32))
            .collect(),
        FieldType::SShort => bytes
            .chunks_exact(2)
            .map(|c| TiffValue::Signed(byte_order.read_i16(c) as i32))
            .collect(),
        FieldType::Long | FieldType::Ifd => bytes
            .chunks_exact(4)
            .map(|c| TiffValue::Unsigned(byte_order.read_u32(c)))
            .collect(),
        FieldType::SLong => bytes
            .chunks_exact(4)
            .map(|c| TiffValue::Signed(byte_order.read_i32(c)))
            .collect(),
        FieldType::Rational => bytes
            .chunks_exact(4)
            .map(|c| TiffValue::Unsigned(byte_order.read_u32(c)))
            .collect(),
        FieldType::SRational => bytes
            .chunks_exact(4)
            .map(|c| TiffValue::Signed(byte_order.read_i32(c)))
            .collect(),
        FieldType::Float => bytes
            .chunks_exact(4)
            .map(|c| TiffValue::Float(byte_order.read_f32(c)))
            .collect(),
        FieldType::Double => bytes
            .chunks_exact(8)
            .map(|c| TiffValue::Double(byte_order.read_f64(c)))
            .collect(),
        FieldType::Long8 | FieldType::Ifd8 => bytes
            .chunks_exact(8)
            .map(|c| TiffValue::Unsigned64(byte_order.read_u64(c)))
            .collect(),
        FieldType::SLong8 => bytes
            .chunks_exact(8)
            .map(|c| TiffValue::Signed64(byte_order.read_i64(c)))
            .collect(),
    }
}

/// Decode by raw type code. Unknown codes yield no values.
pub fn decode_raw(
    type_code: u16,
    count: u64,
    bytes: &[u8],
    byte_order: ByteOrder,
) -> Vec<TiffValue> {
    match FieldType::from_u16(type_code) {
        Some(field_type) => decode_values(field_type, count, bytes, byte_order),
        None => Vec::new(),
    }
}

/// Split ASCII data into one string per NUL-terminated segment.
///
/// A trailing segment without terminator is still emitted.
fn split_ascii(bytes: &[u8]) -> Vec<TiffValue> {
    bytes
        .split_inclusive(|&b| b == 0)
        .map(|segment| {
            let text = segment.strip_suffix(b"\0").unwrap_or(segment);
            TiffValue::Ascii(latin1(text))
        })
        .collect()
}

/// Map bytes to chars one-to-one, so non-ASCII bytes survive display.
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

// =============================================================================
// Tests
// =============================================================================
