//! # bsdgen Types
//!
//! Runtime library for code generated by `bsdgen-codegen`.
//!
//! This crate provides:
//! - The [`BinaryEncoder`] trait implemented by every generated type
//! - Little-endian encodings for the built-in primitives
//! - Opaque built-ins (`ByteString`, `DateTime`, `Guid`, `NodeId`, `Variant`)
//! - Array helpers used for length-determinant fields
//! - Error types for encoding/decoding operations

pub mod array;
pub mod byte_string;
pub mod date_time;
pub mod encoding;
pub mod error;
pub mod guid;
pub mod node_id;
pub mod variant;

pub use array::{ArrayLength, array_length, decode_array, encode_array};
pub use byte_string::ByteString;
pub use date_time::DateTime;
pub use encoding::BinaryEncoder;
pub use error::{EncodingError, EncodingResult};
pub use guid::Guid;
pub use node_id::{Identifier, NodeId};
pub use variant::Variant;
