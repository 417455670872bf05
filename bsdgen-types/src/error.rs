//! Error types for encoding and decoding operations.

use thiserror::Error;

/// Error type for generated encode/decode routines.
#[derive(Debug, Error)]
pub enum EncodingError {
    /// Underlying stream failed or ended early.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Wire value matches no declared enum variant.
    #[error("unknown variant: value {value} is not declared by enum '{type_name}'")]
    UnknownVariant {
        /// Enum type name.
        type_name: &'static str,
        /// Value read from the wire.
        value: i64,
    },

    /// Array has more elements than its length field can express.
    #[error("array '{field}' has {len} elements, too many for its length field")]
    ArrayTooLong {
        /// Array field name.
        field: &'static str,
        /// Actual element count.
        len: usize,
    },

    /// Length-prefixed value does not fit the Int32 prefix.
    #[error("value of {len} bytes exceeds the Int32 length prefix")]
    ValueTooLong {
        /// Byte length of the value.
        len: usize,
    },

    /// Invalid UTF-8 encoding in a string value.
    #[error("invalid UTF-8 in string value: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// Unknown node id encoding byte.
    #[error("invalid node id encoding byte 0x{0:02x}")]
    InvalidNodeIdEncoding(u8),

    /// Variant type id without a runtime representation.
    #[error("unsupported variant type id {0}")]
    UnsupportedVariantType(u8),
}

impl EncodingError {
    /// Creates an unknown variant error.
    #[must_use]
    pub fn unknown_variant(type_name: &'static str, value: impl Into<i64>) -> Self {
        Self::UnknownVariant {
            type_name,
            value: value.into(),
        }
    }
}

/// Result type alias for encoding operations.
pub type EncodingResult<T> = std::result::Result<T, EncodingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_variant_display() {
        let err = EncodingError::unknown_variant("NodeClass", 3i32);
        assert_eq!(
            err.to_string(),
            "unknown variant: value 3 is not declared by enum 'NodeClass'"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let err: EncodingError = io.into();
        assert!(matches!(err, EncodingError::Io(_)));
    }
}
