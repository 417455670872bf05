//! Helpers for arrays whose element count lives in a separate length field.
//!
//! Generated code never writes the count itself: it asks [`array_length`]
//! for the value of the length-determinant field, encodes that field at its
//! schema position, and later calls [`encode_array`] / [`decode_array`] for
//! the elements.

use crate::encoding::BinaryEncoder;
use crate::error::{EncodingError, EncodingResult};
use std::io::{Read, Write};

/// Upper bound on elements preallocated before any of them are decoded.
const MAX_PREALLOCATED: usize = 4096;

/// Integer types that can carry an array element count.
pub trait ArrayLength: Copy {
    /// Converts an element count into this type, if it fits.
    fn from_count(count: usize) -> Option<Self>;

    /// Converts this value into an element count.
    ///
    /// Negative values are the null-array encoding and yield `None`.
    fn to_count(self) -> Option<usize>;
}

macro_rules! impl_array_length {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ArrayLength for $ty {
                #[inline]
                fn from_count(count: usize) -> Option<Self> {
                    <$ty>::try_from(count).ok()
                }

                #[inline]
                fn to_count(self) -> Option<usize> {
                    usize::try_from(self).ok()
                }
            }
        )*
    };
}

impl_array_length!(i8, u8, i16, u16, i32, u32, i64, u64);

/// Computes the length-determinant value for an array field.
///
/// # Arguments
/// * `items` - The array being encoded
/// * `field` - Schema name of the array field, for diagnostics
///
/// # Errors
/// Returns `EncodingError::ArrayTooLong` if the count does not fit `L`.
pub fn array_length<L: ArrayLength, T>(items: &[T], field: &'static str) -> EncodingResult<L> {
    L::from_count(items.len()).ok_or(EncodingError::ArrayTooLong {
        field,
        len: items.len(),
    })
}

/// Encodes every element in order, returning the bytes written.
///
/// # Errors
/// Returns the first element encoding error.
pub fn encode_array<W: Write, T: BinaryEncoder>(
    stream: &mut W,
    items: &[T],
) -> EncodingResult<usize> {
    let mut size = 0;
    for item in items {
        size += item.encode(stream)?;
    }
    Ok(size)
}

/// Decodes exactly `count` elements.
///
/// A negative count decodes to an empty vector.
///
/// # Errors
/// Returns the first element decoding error.
pub fn decode_array<R: Read, T: BinaryEncoder, L: ArrayLength>(
    stream: &mut R,
    count: L,
) -> EncodingResult<Vec<T>> {
    let Some(count) = count.to_count() else {
        return Ok(Vec::new());
    };
    let mut items = Vec::with_capacity(count.min(MAX_PREALLOCATED));
    for _ in 0..count {
        items.push(T::decode(stream)?);
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_length_fits() {
        let items = [1i32, 2, 3];
        let len: i32 = array_length(&items, "Items").unwrap();
        assert_eq!(len, 3);
    }

    #[test]
    fn test_array_length_overflow() {
        let items = vec![0u8; 300];
        let result: EncodingResult<u8> = array_length(&items, "Items");
        assert!(matches!(
            result,
            Err(EncodingError::ArrayTooLong {
                field: "Items",
                len: 300
            })
        ));
    }

    #[test]
    fn test_encode_decode_array() {
        let items = vec![10u16, 20, 30];
        let mut buffer = Vec::new();
        let size = encode_array(&mut buffer, &items).unwrap();
        assert_eq!(size, 6);

        let decoded: Vec<u16> = decode_array(&mut buffer.as_slice(), 3i32).unwrap();
        assert_eq!(decoded, items);
    }

    #[test]
    fn test_negative_count_is_empty() {
        let decoded: Vec<u16> = decode_array(&mut [0u8; 0].as_slice(), -1i32).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_count_beyond_data_fails() {
        let buffer = [1u8, 0];
        let result: EncodingResult<Vec<u16>> = decode_array(&mut buffer.as_slice(), 1_000_000u32);
        assert!(result.is_err());
    }
}
