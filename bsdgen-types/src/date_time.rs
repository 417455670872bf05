//! Timestamps encoded as 100-nanosecond ticks since 1601-01-01 UTC.

use crate::encoding::BinaryEncoder;
use crate::error::EncodingResult;
use chrono::{TimeZone, Utc};
use std::io::{Read, Write};

/// Ticks between 1601-01-01 and the Unix epoch.
const TICKS_TO_UNIX_EPOCH: i64 = 116_444_736_000_000_000;

/// Ticks per second.
const TICKS_PER_SECOND: i64 = 10_000_000;

/// A point in time as carried on the wire.
///
/// The raw tick count is kept so that decode/encode is lossless; conversion
/// to and from [`chrono::DateTime`] truncates to 100ns resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DateTime {
    ticks: i64,
}

impl DateTime {
    /// Creates a timestamp from raw ticks.
    #[must_use]
    pub const fn from_ticks(ticks: i64) -> Self {
        Self { ticks }
    }

    /// Returns the raw tick count.
    #[must_use]
    pub const fn ticks(&self) -> i64 {
        self.ticks
    }

    /// Returns the current time.
    #[must_use]
    pub fn now() -> Self {
        Self::from(Utc::now())
    }

    /// Converts to a chrono timestamp, or `None` if out of chrono's range.
    #[must_use]
    pub fn to_chrono(&self) -> Option<chrono::DateTime<Utc>> {
        let unix_ticks = self.ticks.checked_sub(TICKS_TO_UNIX_EPOCH)?;
        let secs = unix_ticks.div_euclid(TICKS_PER_SECOND);
        let nanos = (unix_ticks.rem_euclid(TICKS_PER_SECOND) * 100) as u32;
        Utc.timestamp_opt(secs, nanos).single()
    }
}

impl From<chrono::DateTime<Utc>> for DateTime {
    fn from(value: chrono::DateTime<Utc>) -> Self {
        let secs = value.timestamp();
        let sub_ticks = i64::from(value.timestamp_subsec_nanos() / 100);
        let ticks = secs
            .saturating_mul(TICKS_PER_SECOND)
            .saturating_add(sub_ticks)
            .saturating_add(TICKS_TO_UNIX_EPOCH);
        Self { ticks }
    }
}

impl BinaryEncoder for DateTime {
    #[inline(always)]
    fn byte_len(&self) -> usize {
        8
    }

    fn encode<W: Write>(&self, stream: &mut W) -> EncodingResult<usize> {
        self.ticks.encode(stream)
    }

    fn decode<R: Read>(stream: &mut R) -> EncodingResult<Self> {
        Ok(Self {
            ticks: i64::decode(stream)?,
        })
    }
}
