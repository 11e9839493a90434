use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// Whole days from `from` to `to` (negative if `to` is earlier).
#[inline]
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// An inclusive range of calendar days. `end` is never before `start`;
/// a single-day task has `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDates")]
pub struct DateInterval {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDates {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDates> for DateInterval {
    type Error = FormatError;

    fn try_from(raw: RawDates) -> Result<Self, Self::Error> {
        DateInterval::new(raw.start, raw.end)
    }
}

impl DateInterval {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, FormatError> {
        if end < start {
            return Err(FormatError::InvertedDates {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// A one-day interval.
    pub fn single(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    #[inline]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[inline]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Days from start to end; zero for a single-day interval.
    pub fn span_days(&self) -> i64 {
        days_between(self.start, self.end)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start && day <= self.end
    }

    pub fn intersects(&self, other: &DateInterval) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Both ends moved by the same number of days.
    pub fn shifted(&self, days: i64) -> Self {
        Self {
            start: self.start + Duration::days(days),
            end: self.end + Duration::days(days),
        }
    }

    /// Move the start by `days`, stopping at the end rather than crossing it.
    pub fn with_start_moved(&self, days: i64) -> Self {
        let start = (self.start + Duration::days(days)).min(self.end);
        Self { start, end: self.end }
    }

    /// Move the end by `days`, stopping at the start rather than crossing it.
    pub fn with_end_moved(&self, days: i64) -> Self {
        let end = (self.end + Duration::days(days)).max(self.start);
        Self { start: self.start, end }
    }

    /// Shift by `days`, stopping where the interval meets an edge of
    /// `bounds`. A shift never takes it further outside `bounds` than it
    /// already is, so an interval that straddles an edge only moves inward.
    pub fn shifted_within(&self, days: i64, bounds: &DateInterval) -> Self {
        let days = if days > 0 {
            days.min(days_between(self.end, bounds.end).max(0))
        } else {
            days.max(days_between(self.start, bounds.start).min(0))
        };
        self.shifted(days)
    }

    /// Smallest interval covering every input, or `None` for no input.
    pub fn union_all(intervals: impl IntoIterator<Item = DateInterval>) -> Option<DateInterval> {
        intervals.into_iter().reduce(|acc, iv| DateInterval {
            start: acc.start.min(iv.start),
            end: acc.end.max(iv.end),
        })
    }
}
