//! Length-prefixed opaque byte sequences.

use crate::encoding::{BinaryEncoder, read_length_prefixed, write_length_prefixed};
use crate::error::EncodingResult;
use std::io::{Read, Write};

/// A sequence of octets with an Int32 length prefix on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ByteString(pub Vec<u8>);

impl ByteString {
    /// Returns the bytes as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Returns true if there are no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for ByteString {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl From<&[u8]> for ByteString {
    fn from(value: &[u8]) -> Self {
        Self(value.to_vec())
    }
}

impl BinaryEncoder for ByteString {
    fn byte_len(&self) -> usize {
        4 + self.0.len()
    }

    fn encode<W: Write>(&self, stream: &mut W) -> EncodingResult<usize> {
        write_length_prefixed(stream, &self.0)
    }

    fn decode<R: Read>(stream: &mut R) -> EncodingResult<Self> {
        Ok(Self(read_length_prefixed(stream)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_string_wire_format() {
        let value = ByteString::from(&[0xDEu8, 0xAD][..]);
        let buffer = value.encode_to_vec().unwrap();
        assert_eq!(buffer, [2, 0, 0, 0, 0xDE, 0xAD]);
        assert_eq!(ByteString::decode(&mut buffer.as_slice()).unwrap(), value);
    }

    #[test]
    fn test_empty_byte_string() {
        let value = ByteString::default();
        assert!(value.is_empty());
        assert_eq!(value.byte_len(), 4);
    }
}
