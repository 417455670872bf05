//! The [`BinaryEncoder`] trait and its primitive implementations.
//!
//! All multi-byte values use little-endian byte order.

use crate::error::{EncodingError, EncodingResult};
use std::io::{Read, Write};

/// Trait for types with a binary wire representation.
///
/// Every generated struct and enum implements this trait, and so does every
/// built-in primitive that generated code may reference.
///
/// # Example
/// ```
/// use bsdgen_types::BinaryEncoder;
///
/// let mut buffer = Vec::new();
/// let written = 42i32.encode(&mut buffer).unwrap();
/// assert_eq!(written, 4);
/// assert_eq!(i32::decode(&mut buffer.as_slice()).unwrap(), 42);
/// ```
pub trait BinaryEncoder: Sized {
    /// Returns the number of bytes `encode` will write.
    fn byte_len(&self) -> usize;

    /// Writes the value to the stream, returning the number of bytes written.
    ///
    /// # Errors
    /// Returns `EncodingError` if the stream fails or the value cannot be
    /// represented on the wire.
    fn encode<W: Write>(&self, stream: &mut W) -> EncodingResult<usize>;

    /// Reads a value from the stream.
    ///
    /// # Errors
    /// Returns `EncodingError` if the stream ends early or holds invalid data.
    fn decode<R: Read>(stream: &mut R) -> EncodingResult<Self>;

    /// Encodes the value into a new byte vector.
    ///
    /// # Errors
    /// Returns `EncodingError` if encoding fails.
    fn encode_to_vec(&self) -> EncodingResult<Vec<u8>> {
        let mut buffer = Vec::with_capacity(self.byte_len());
        self.encode(&mut buffer)?;
        Ok(buffer)
    }
}

/// Reads exactly `N` bytes from the stream.
#[inline]
pub(crate) fn read_array<R: Read, const N: usize>(stream: &mut R) -> EncodingResult<[u8; N]> {
    let mut bytes = [0u8; N];
    stream.read_exact(&mut bytes)?;
    Ok(bytes)
}

/// Writes all bytes, returning the count.
#[inline]
pub(crate) fn write_bytes<W: Write>(stream: &mut W, bytes: &[u8]) -> EncodingResult<usize> {
    stream.write_all(bytes)?;
    Ok(bytes.len())
}

macro_rules! impl_number {
    ($($ty:ty),* $(,)?) => {
        $(
            impl BinaryEncoder for $ty {
                #[inline(always)]
                fn byte_len(&self) -> usize {
                    std::mem::size_of::<$ty>()
                }

                #[inline]
                fn encode<W: Write>(&self, stream: &mut W) -> EncodingResult<usize> {
                    write_bytes(stream, &self.to_le_bytes())
                }

                #[inline]
                fn decode<R: Read>(stream: &mut R) -> EncodingResult<Self> {
                    Ok(<$ty>::from_le_bytes(read_array(stream)?))
                }
            }
        )*
    };
}

impl_number!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);

impl BinaryEncoder for bool {
    #[inline(always)]
    fn byte_len(&self) -> usize {
        1
    }

    fn encode<W: Write>(&self, stream: &mut W) -> EncodingResult<usize> {
        write_bytes(stream, &[u8::from(*self)])
    }

    fn decode<R: Read>(stream: &mut R) -> EncodingResult<Self> {
        Ok(u8::decode(stream)? != 0)
    }
}

/// Writes an Int32 length prefix followed by the bytes.
pub(crate) fn write_length_prefixed<W: Write>(
    stream: &mut W,
    bytes: &[u8],
) -> EncodingResult<usize> {
    let len =
        i32::try_from(bytes.len()).map_err(|_| EncodingError::ValueTooLong { len: bytes.len() })?;
    let mut size = len.encode(stream)?;
    size += write_bytes(stream, bytes)?;
    Ok(size)
}

/// Reads an Int32 length prefix followed by that many bytes.
///
/// A negative length is the null encoding and yields an empty vector.
pub(crate) fn read_length_prefixed<R: Read>(stream: &mut R) -> EncodingResult<Vec<u8>> {
    let len = i32::decode(stream)?;
    let Ok(len) = usize::try_from(len) else {
        return Ok(Vec::new());
    };
    let mut bytes = Vec::new();
    (&mut *stream).take(len as u64).read_to_end(&mut bytes)?;
    if bytes.len() != len {
        return Err(EncodingError::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "length-prefixed value truncated",
        )));
    }
    Ok(bytes)
}

impl BinaryEncoder for String {
    fn byte_len(&self) -> usize {
        4 + self.len()
    }

    fn encode<W: Write>(&self, stream: &mut W) -> EncodingResult<usize> {
        write_length_prefixed(stream, self.as_bytes())
    }

    fn decode<R: Read>(stream: &mut R) -> EncodingResult<Self> {
        Ok(String::from_utf8(read_length_prefixed(stream)?)?)
    }
}
