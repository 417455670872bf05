//! The built-in primitive table.
//!
//! Every schema-native scalar maps to exactly one Rust representation and
//! wire width here. The resolver uses [`BuiltinType::from_schema_name`] to
//! resolve references and the emitter uses [`BuiltinType::rust_type`] and
//! [`BuiltinType::wire_size`] to render them, so both sides agree by
//! construction.

/// Built-in primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuiltinType {
    /// Boolean (1 byte).
    Boolean,
    /// Signed 8-bit integer.
    SByte,
    /// Unsigned 8-bit integer.
    Byte,
    /// Signed 16-bit integer.
    Int16,
    /// Unsigned 16-bit integer.
    UInt16,
    /// Signed 32-bit integer.
    Int32,
    /// Unsigned 32-bit integer.
    UInt32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 64-bit integer.
    UInt64,
    /// 32-bit floating point.
    Float,
    /// 64-bit floating point.
    Double,
    /// Length-prefixed UTF-8 string.
    String,
    /// Length-prefixed byte sequence.
    ByteString,
    /// 64-bit tick timestamp.
    DateTime,
    /// 16-byte GUID.
    Guid,
    /// Opaque node identifier.
    NodeId,
    /// Opaque self-describing value.
    Variant,
}

impl BuiltinType {
    /// Every built-in, in table order.
    pub const ALL: [Self; 17] = [
        Self::Boolean,
        Self::SByte,
        Self::Byte,
        Self::Int16,
        Self::UInt16,
        Self::Int32,
        Self::UInt32,
        Self::Int64,
        Self::UInt64,
        Self::Float,
        Self::Double,
        Self::String,
        Self::ByteString,
        Self::DateTime,
        Self::Guid,
        Self::NodeId,
        Self::Variant,
    ];

    /// Returns the schema type name.
    #[must_use]
    pub const fn schema_name(&self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::SByte => "SByte",
            Self::Byte => "Byte",
            Self::Int16 => "Int16",
            Self::UInt16 => "UInt16",
            Self::Int32 => "Int32",
            Self::UInt32 => "UInt32",
            Self::Int64 => "Int64",
            Self::UInt64 => "UInt64",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::String => "String",
            Self::ByteString => "ByteString",
            Self::DateTime => "DateTime",
            Self::Guid => "Guid",
            Self::NodeId => "NodeId",
            Self::Variant => "Variant",
        }
    }

    /// Parses a built-in from its schema name.
    ///
    /// `CharArray` is accepted as a synonym for `String`.
    #[must_use]
    pub fn from_schema_name(name: &str) -> Option<Self> {
        match name {
            "CharArray" => Some(Self::String),
            _ => Self::ALL.into_iter().find(|b| b.schema_name() == name),
        }
    }

    /// Returns the Rust type name for this built-in.
    #[must_use]
    pub const fn rust_type(&self) -> &'static str {
        match self {
            Self::Boolean => "bool",
            Self::SByte => "i8",
            Self::Byte => "u8",
            Self::Int16 => "i16",
            Self::UInt16 => "u16",
            Self::Int32 => "i32",
            Self::UInt32 => "u32",
            Self::Int64 => "i64",
            Self::UInt64 => "u64",
            Self::Float => "f32",
            Self::Double => "f64",
            Self::String => "String",
            Self::ByteString => "ByteString",
            Self::DateTime => "DateTime",
            Self::Guid => "Guid",
            Self::NodeId => "NodeId",
            Self::Variant => "Variant",
        }
    }

    /// Returns the fixed wire size in bytes, or `None` if variable.
    #[must_use]
    pub const fn wire_size(&self) -> Option<usize> {
        match self {
            Self::Boolean | Self::SByte | Self::Byte => Some(1),
            Self::Int16 | Self::UInt16 => Some(2),
            Self::Int32 | Self::UInt32 | Self::Float => Some(4),
            Self::Int64 | Self::UInt64 | Self::Double | Self::DateTime => Some(8),
            Self::Guid => Some(16),
            Self::String | Self::ByteString | Self::NodeId | Self::Variant => None,
        }
    }

    /// Returns true for integer types.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        self.is_signed() || self.is_unsigned()
    }

    /// Returns true for signed integer types.
    #[must_use]
    pub const fn is_signed(&self) -> bool {
        matches!(self, Self::SByte | Self::Int16 | Self::Int32 | Self::Int64)
    }

    /// Returns true for unsigned integer types.
    #[must_use]
    pub const fn is_unsigned(&self) -> bool {
        matches!(self, Self::Byte | Self::UInt16 | Self::UInt32 | Self::UInt64)
    }

    /// Returns the bit width of integer types.
    #[must_use]
    pub const fn bit_width(&self) -> Option<u32> {
        if !self.is_integer() {
            return None;
        }
        match self.wire_size() {
            Some(bytes) => Some(bytes as u32 * 8),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_bidirectional() {
        for builtin in BuiltinType::ALL {
            assert_eq!(
                BuiltinType::from_schema_name(builtin.schema_name()),
                Some(builtin)
            );
        }
    }

    #[test]
    fn test_char_array_synonym() {
        assert_eq!(
            BuiltinType::from_schema_name("CharArray"),
            Some(BuiltinType::String)
        );
        assert_eq!(BuiltinType::from_schema_name("Unknown"), None);
    }

    #[test]
    fn test_wire_sizes() {
        assert_eq!(BuiltinType::Byte.wire_size(), Some(1));
        assert_eq!(BuiltinType::Int32.wire_size(), Some(4));
        assert_eq!(BuiltinType::Guid.wire_size(), Some(16));
        assert_eq!(BuiltinType::String.wire_size(), None);
    }

    #[test]
    fn test_integer_classification() {
        assert_eq!(BuiltinType::UInt16.bit_width(), Some(16));
        assert_eq!(BuiltinType::Int64.bit_width(), Some(64));
        assert_eq!(BuiltinType::Double.bit_width(), None);
        assert!(BuiltinType::Byte.is_unsigned());
        assert!(!BuiltinType::Byte.is_signed());
        assert!(!BuiltinType::Boolean.is_integer());
    }

    #[test]
    fn test_rust_types() {
        assert_eq!(BuiltinType::Int32.rust_type(), "i32");
        assert_eq!(BuiltinType::ByteString.rust_type(), "ByteString");
        assert_eq!(BuiltinType::Boolean.rust_type(), "bool");
    }
}
