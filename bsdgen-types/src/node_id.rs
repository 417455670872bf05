//! Node identifiers.
//!
//! The first byte on the wire selects the encoding. Numeric identifiers use
//! the most compact form that can hold them, so every numeric node id
//! round-trips regardless of which form it was read from.

use crate::byte_string::ByteString;
use crate::encoding::BinaryEncoder;
use crate::error::{EncodingError, EncodingResult};
use crate::guid::Guid;
use std::io::{Read, Write};

const TWO_BYTE: u8 = 0x00;
const FOUR_BYTE: u8 = 0x01;
const NUMERIC: u8 = 0x02;
const STRING: u8 = 0x03;
const GUID: u8 = 0x04;
const BYTE_STRING: u8 = 0x05;

/// The identifier part of a node id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    /// Numeric identifier.
    Numeric(u32),
    /// String identifier.
    String(String),
    /// GUID identifier.
    Guid(Guid),
    /// Opaque identifier.
    Opaque(ByteString),
}

/// A namespace-qualified node identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeId {
    /// Namespace index.
    pub namespace: u16,
    /// Identifier within the namespace.
    pub identifier: Identifier,
}

impl NodeId {
    /// Creates a numeric node id.
    #[must_use]
    pub const fn numeric(namespace: u16, value: u32) -> Self {
        Self {
            namespace,
            identifier: Identifier::Numeric(value),
        }
    }

    /// Creates a string node id.
    #[must_use]
    pub fn string(namespace: u16, value: impl Into<String>) -> Self {
        Self {
            namespace,
            identifier: Identifier::String(value.into()),
        }
    }

    /// The null node id (`ns=0;i=0`).
    #[must_use]
    pub const fn null() -> Self {
        Self::numeric(0, 0)
    }

    /// Returns true for the null node id.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.namespace == 0 && self.identifier == Identifier::Numeric(0)
    }

    /// Selects the encoding byte for this node id.
    fn encoding(&self) -> u8 {
        match &self.identifier {
            Identifier::Numeric(value) if self.namespace == 0 && *value <= 0xFF => TWO_BYTE,
            Identifier::Numeric(value) if self.namespace <= 0xFF && *value <= 0xFFFF => FOUR_BYTE,
            Identifier::Numeric(_) => NUMERIC,
            Identifier::String(_) => STRING,
            Identifier::Guid(_) => GUID,
            Identifier::Opaque(_) => BYTE_STRING,
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::null()
    }
}

impl BinaryEncoder for NodeId {
    fn byte_len(&self) -> usize {
        match (self.encoding(), &self.identifier) {
            (TWO_BYTE, _) => 2,
            (FOUR_BYTE, _) => 4,
            (_, Identifier::Numeric(_)) => 7,
            (_, Identifier::String(value)) => 3 + value.byte_len(),
            (_, Identifier::Guid(value)) => 3 + value.byte_len(),
            (_, Identifier::Opaque(value)) => 3 + value.byte_len(),
        }
    }

    fn encode<W: Write>(&self, stream: &mut W) -> EncodingResult<usize> {
        let encoding = self.encoding();
        let mut size = encoding.encode(stream)?;
        match (&self.identifier, encoding) {
            (Identifier::Numeric(value), TWO_BYTE) => {
                size += (*value as u8).encode(stream)?;
            }
            (Identifier::Numeric(value), FOUR_BYTE) => {
                size += (self.namespace as u8).encode(stream)?;
                size += (*value as u16).encode(stream)?;
            }
            (Identifier::Numeric(value), _) => {
                size += self.namespace.encode(stream)?;
                size += value.encode(stream)?;
            }
            (Identifier::String(value), _) => {
                size += self.namespace.encode(stream)?;
                size += value.encode(stream)?;
            }
            (Identifier::Guid(value), _) => {
                size += self.namespace.encode(stream)?;
                size += value.encode(stream)?;
            }
            (Identifier::Opaque(value), _) => {
                size += self.namespace.encode(stream)?;
                size += value.encode(stream)?;
            }
        }
        Ok(size)
    }

    fn decode<R: Read>(stream: &mut R) -> EncodingResult<Self> {
        let encoding = u8::decode(stream)?;
        let node_id = match encoding {
            TWO_BYTE => Self::numeric(0, u32::from(u8::decode(stream)?)),
            FOUR_BYTE => {
                let namespace = u16::from(u8::decode(stream)?);
                Self::numeric(namespace, u32::from(u16::decode(stream)?))
            }
            NUMERIC => {
                let namespace = u16::decode(stream)?;
                Self::numeric(namespace, u32::decode(stream)?)
            }
            STRING => {
                let namespace = u16::decode(stream)?;
                Self::string(namespace, String::decode(stream)?)
            }
            GUID => Self {
                namespace: u16::decode(stream)?,
                identifier: Identifier::Guid(Guid::decode(stream)?),
            },
            BYTE_STRING => Self {
                namespace: u16::decode(stream)?,
                identifier: Identifier::Opaque(ByteString::decode(stream)?),
            },
            other => return Err(EncodingError::InvalidNodeIdEncoding(other)),
        };
        Ok(node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(node_id: &NodeId) -> NodeId {
        let buffer = node_id.encode_to_vec().unwrap();
        assert_eq!(buffer.len(), node_id.byte_len());
        NodeId::decode(&mut buffer.as_slice()).unwrap()
    }

    #[test]
    fn test_two_byte_form() {
        let node_id = NodeId::numeric(0, 85);
        assert_eq!(node_id.encode_to_vec().unwrap(), [0x00, 85]);
        assert_eq!(round_trip(&node_id), node_id);
    }

    #[test]
    fn test_four_byte_form() {
        let node_id = NodeId::numeric(2, 1025);
        assert_eq!(node_id.encode_to_vec().unwrap(), [0x01, 2, 0x01, 0x04]);
        assert_eq!(round_trip(&node_id), node_id);
    }

    #[test]
    fn test_full_numeric_form() {
        let node_id = NodeId::numeric(300, 70_000);
        assert_eq!(node_id.byte_len(), 7);
        assert_eq!(round_trip(&node_id), node_id);
    }

    #[test]
    fn test_string_guid_opaque_forms() {
        let nodes = [
            NodeId::string(1, "Demo.Static"),
            NodeId {
                namespace: 4,
                identifier: Identifier::Guid(Guid::new_random()),
            },
            NodeId {
                namespace: 5,
                identifier: Identifier::Opaque(ByteString(vec![1, 2, 3])),
            },
        ];
        for node_id in &nodes {
            assert_eq!(&round_trip(node_id), node_id);
        }
    }

    #[test]
    fn test_numeric_form_normalizes() {
        let buffer = [NUMERIC, 0, 0, 5, 0, 0, 0];
        let node_id = NodeId::decode(&mut buffer.as_slice()).unwrap();
        assert_eq!(node_id, NodeId::numeric(0, 5));
        assert_eq!(node_id.encode_to_vec().unwrap(), [TWO_BYTE, 5]);
    }

    #[test]
    fn test_invalid_encoding_byte() {
        let buffer = [0x42u8, 0];
        assert!(matches!(
            NodeId::decode(&mut buffer.as_slice()),
            Err(EncodingError::InvalidNodeIdEncoding(0x42))
        ));
    }

    #[test]
    fn test_null_node_id() {
        assert!(NodeId::default().is_null());
        assert!(!NodeId::numeric(1, 0).is_null());
    }
}
