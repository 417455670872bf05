//! Self-describing scalar values.
//!
//! A variant is written as a one-byte built-in type id followed by the value.
//! Only scalar values are supported; array and dimension flags are rejected.

use crate::byte_string::ByteString;
use crate::date_time::DateTime;
use crate::encoding::BinaryEncoder;
use crate::error::{EncodingError, EncodingResult};
use crate::guid::Guid;
use crate::node_id::NodeId;
use std::io::{Read, Write};

/// A tagged scalar value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Variant {
    /// No value.
    #[default]
    Empty,
    /// Boolean value.
    Boolean(bool),
    /// Signed 8-bit value.
    SByte(i8),
    /// Unsigned 8-bit value.
    Byte(u8),
    /// Signed 16-bit value.
    Int16(i16),
    /// Unsigned 16-bit value.
    UInt16(u16),
    /// Signed 32-bit value.
    Int32(i32),
    /// Unsigned 32-bit value.
    UInt32(u32),
    /// Signed 64-bit value.
    Int64(i64),
    /// Unsigned 64-bit value.
    UInt64(u64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// UTF-8 string.
    String(String),
    /// Timestamp.
    DateTime(DateTime),
    /// GUID.
    Guid(Guid),
    /// Byte string.
    ByteString(ByteString),
    /// Node id.
    NodeId(NodeId),
}

impl Variant {
    /// Returns the built-in type id written before the value.
    #[must_use]
    pub const fn type_id(&self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Boolean(_) => 1,
            Self::SByte(_) => 2,
            Self::Byte(_) => 3,
            Self::Int16(_) => 4,
            Self::UInt16(_) => 5,
            Self::Int32(_) => 6,
            Self::UInt32(_) => 7,
            Self::Int64(_) => 8,
            Self::UInt64(_) => 9,
            Self::Float(_) => 10,
            Self::Double(_) => 11,
            Self::String(_) => 12,
            Self::DateTime(_) => 13,
            Self::Guid(_) => 14,
            Self::ByteString(_) => 15,
            Self::NodeId(_) => 17,
        }
    }

    /// Returns the encoded size of the value without the type id.
    fn value_len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Boolean(v) => v.byte_len(),
            Self::SByte(v) => v.byte_len(),
            Self::Byte(v) => v.byte_len(),
            Self::Int16(v) => v.byte_len(),
            Self::UInt16(v) => v.byte_len(),
            Self::Int32(v) => v.byte_len(),
            Self::UInt32(v) => v.byte_len(),
            Self::Int64(v) => v.byte_len(),
            Self::UInt64(v) => v.byte_len(),
            Self::Float(v) => v.byte_len(),
            Self::Double(v) => v.byte_len(),
            Self::String(v) => v.byte_len(),
            Self::DateTime(v) => v.byte_len(),
            Self::Guid(v) => v.byte_len(),
            Self::ByteString(v) => v.byte_len(),
            Self::NodeId(v) => v.byte_len(),
        }
    }
}

impl BinaryEncoder for Variant {
    fn byte_len(&self) -> usize {
        1 + self.value_len()
    }

    fn encode<W: Write>(&self, stream: &mut W) -> EncodingResult<usize> {
        let mut size = self.type_id().encode(stream)?;
        size += match self {
            Self::Empty => 0,
            Self::Boolean(v) => v.encode(stream)?,
            Self::SByte(v) => v.encode(stream)?,
            Self::Byte(v) => v.encode(stream)?,
            Self::Int16(v) => v.encode(stream)?,
            Self::UInt16(v) => v.encode(stream)?,
            Self::Int32(v) => v.encode(stream)?,
            Self::UInt32(v) => v.encode(stream)?,
            Self::Int64(v) => v.encode(stream)?,
            Self::UInt64(v) => v.encode(stream)?,
            Self::Float(v) => v.encode(stream)?,
            Self::Double(v) => v.encode(stream)?,
            Self::String(v) => v.encode(stream)?,
            Self::DateTime(v) => v.encode(stream)?,
            Self::Guid(v) => v.encode(stream)?,
            Self::ByteString(v) => v.encode(stream)?,
            Self::NodeId(v) => v.encode(stream)?,
        };
        Ok(size)
    }

    fn decode<R: Read>(stream: &mut R) -> EncodingResult<Self> {
        let type_id = u8::decode(stream)?;
        let value = match type_id {
            0 => Self::Empty,
            1 => Self::Boolean(bool::decode(stream)?),
            2 => Self::SByte(i8::decode(stream)?),
            3 => Self::Byte(u8::decode(stream)?),
            4 => Self::Int16(i16::decode(stream)?),
            5 => Self::UInt16(u16::decode(stream)?),
            6 => Self::Int32(i32::decode(stream)?),
            7 => Self::UInt32(u32::decode(stream)?),
            8 => Self::Int64(i64::decode(stream)?),
            9 => Self::UInt64(u64::decode(stream)?),
            10 => Self::Float(f32::decode(stream)?),
            11 => Self::Double(f64::decode(stream)?),
            12 => Self::String(String::decode(stream)?),
            13 => Self::DateTime(DateTime::decode(stream)?),
            14 => Self::Guid(Guid::decode(stream)?),
            15 => Self::ByteString(ByteString::decode(stream)?),
            17 => Self::NodeId(NodeId::decode(stream)?),
            other => return Err(EncodingError::UnsupportedVariantType(other)),
        };
        Ok(value)
    }
}
