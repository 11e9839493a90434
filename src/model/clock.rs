//! Wall-clock times and half-open time intervals.
//!
//! A [`ClockTime`] is a count of minutes since local midnight. There is no
//! timezone handling; `"HH:MM"` is the only text form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// Minutes in a day. `24:00` is accepted as the closing edge of a day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Minutes since local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u32);

impl ClockTime {
    pub const MIDNIGHT: ClockTime = ClockTime(0);

    /// Build from a minute count. Values past `24:00` are rejected.
    pub fn from_minutes(minutes: u32) -> Result<Self, FormatError> {
        if minutes > MINUTES_PER_DAY {
            return Err(FormatError::OutOfRange(minutes_to_clock_time(minutes)));
        }
        Ok(Self(minutes))
    }

    pub fn from_hm(hours: u32, minutes: u32) -> Result<Self, FormatError> {
        if minutes >= 60 {
            return Err(FormatError::OutOfRange(format!("{hours:02}:{minutes:02}")));
        }
        Self::from_minutes(hours * 60 + minutes)
    }

    #[inline]
    pub fn minutes(self) -> u32 {
        self.0
    }

    /// Shift by a signed number of minutes, saturating at midnight and `24:00`.
    pub fn offset(self, delta_minutes: i64) -> Self {
        let shifted = (self.0 as i64 + delta_minutes).clamp(0, MINUTES_PER_DAY as i64);
        Self(shifted as u32)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&minutes_to_clock_time(self.0))
    }
}

impl FromStr for ClockTime {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        clock_time_to_minutes(s).map(ClockTime)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = FormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

/// Parse `"HH:MM"` into minutes since midnight.
///
/// Both fields must be exactly two digits. `"24:00"` is the only value past
/// `"23:59"` that is accepted.
pub fn clock_time_to_minutes(text: &str) -> Result<u32, FormatError> {
    let (h, m) = text
        .split_once(':')
        .ok_or_else(|| FormatError::Malformed(text.to_string()))?;
    let two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
    if !two_digits(h) || !two_digits(m) {
        return Err(FormatError::Malformed(text.to_string()));
    }
    let hours: u32 = h
        .parse()
        .map_err(|_| FormatError::Malformed(text.to_string()))?;
    let minutes: u32 = m
        .parse()
        .map_err(|_| FormatError::Malformed(text.to_string()))?;
    if minutes >= 60 || hours > 24 || (hours == 24 && minutes != 0) {
        return Err(FormatError::OutOfRange(text.to_string()));
    }
    Ok(hours * 60 + minutes)
}

/// Format minutes since midnight as zero-padded `"HH:MM"`.
pub fn minutes_to_clock_time(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Index of the slot containing `minutes` on a grid that opens at
/// `grid_start_minutes`. Times before the grid give negative indices.
pub fn minutes_to_slot_index(minutes: u32, grid_start_minutes: u32, slot_size_minutes: u32) -> i64 {
    let from_start = minutes as i64 - grid_start_minutes as i64;
    from_start.div_euclid(slot_size_minutes.max(1) as i64)
}

/// Half-open overlap test. Touching intervals do not overlap.
#[inline]
pub fn intervals_overlap(a_start: u32, a_end: u32, b_start: u32, b_end: u32) -> bool {
    a_start < b_end && a_end > b_start
}

/// A `[start, end)` range of wall-clock time. `end` is always after `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct TimeInterval {
    start: ClockTime,
    end: ClockTime,
}

#[derive(Deserialize)]
struct RawInterval {
    start: ClockTime,
    end: ClockTime,
}

impl TryFrom<RawInterval> for TimeInterval {
    type Error = FormatError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        TimeInterval::new(raw.start, raw.end)
    }
}

impl TimeInterval {
    pub fn new(start: ClockTime, end: ClockTime) -> Result<Self, FormatError> {
        if end <= start {
            return Err(FormatError::EmptyInterval {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parse a pair of `"HH:MM"` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, FormatError> {
        Self::new(start.parse()?, end.parse()?)
    }

    #[inline]
    pub fn start(&self) -> ClockTime {
        self.start
    }

    #[inline]
    pub fn end(&self) -> ClockTime {
        self.end
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end.minutes() - self.start.minutes()
    }

    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        intervals_overlap(
            self.start.minutes(),
            self.end.minutes(),
            other.start.minutes(),
            other.end.minutes(),
        )
    }

    /// True if any of `others` overlaps this interval.
    pub fn collides_with<'a>(&self, others: impl IntoIterator<Item = &'a TimeInterval>) -> bool {
        others.into_iter().any(|other| self.overlaps(other))
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}–{}", self.start, self.end)
    }
}
