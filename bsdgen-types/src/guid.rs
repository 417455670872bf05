//! 16-byte globally unique identifiers.

use crate::encoding::{BinaryEncoder, read_array, write_bytes};
use crate::error::EncodingResult;
use std::io::{Read, Write};
use uuid::Uuid;

/// A GUID in the mixed-endian wire layout: the first three groups are
/// little-endian, the trailing eight bytes are written as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Guid(pub Uuid);

impl Guid {
    /// The all-zero GUID.
    pub const NULL: Self = Self(Uuid::nil());

    /// Creates a random GUID.
    #[must_use]
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for Guid {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Guid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl BinaryEncoder for Guid {
    #[inline(always)]
    fn byte_len(&self) -> usize {
        16
    }

    fn encode<W: Write>(&self, stream: &mut W) -> EncodingResult<usize> {
        write_bytes(stream, &self.0.to_bytes_le())
    }

    fn decode<R: Read>(stream: &mut R) -> EncodingResult<Self> {
        Ok(Self(Uuid::from_bytes_le(read_array(stream)?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_endian_layout() {
        let uuid = Uuid::parse_str("72962b91-fa75-4ae6-8d28-b404dc7daf63").unwrap();
        let buffer = Guid(uuid).encode_to_vec().unwrap();
        assert_eq!(&buffer[..4], &[0x91, 0x2b, 0x96, 0x72]);
        assert_eq!(&buffer[4..6], &[0x75, 0xfa]);
        assert_eq!(&buffer[6..8], &[0xe6, 0x4a]);
        assert_eq!(&buffer[8..], &[0x8d, 0x28, 0xb4, 0x04, 0xdc, 0x7d, 0xaf, 0x63]);
    }

    #[test]
    fn test_random_round_trip() {
        let guid = Guid::new_random();
        let buffer = guid.encode_to_vec().unwrap();
        assert_eq!(Guid::decode(&mut buffer.as_slice()).unwrap(), guid);
    }
}
