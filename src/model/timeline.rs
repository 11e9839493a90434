use chrono::{Duration, NaiveDate};

use super::dates::{days_between, DateInterval};

pub const MIN_DAY_WIDTH: f32 = 12.0;
pub const MAX_DAY_WIDTH: f32 = 160.0;

/// The visible window of the Gantt timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineViewport {
    /// First visible day.
    pub start: NaiveDate,
    /// Last visible day (inclusive).
    pub end: NaiveDate,
    /// Pixels per calendar day.
    pub day_width: f32,
    /// Horizontal gap left at the end of each bar.
    pub bar_margin: f32,
}

impl TimelineViewport {
    pub fn new(start: NaiveDate, end: NaiveDate, day_width: f32) -> Self {
        Self {
            start,
            end: end.max(start),
            day_width,
            bar_margin: 4.0,
        }
    }

    /// The visible days as an interval.
    pub fn range(&self) -> DateInterval {
        DateInterval::single(self.start).with_end_moved(days_between(self.start, self.end))
    }

    pub fn day_count(&self) -> i64 {
        days_between(self.start, self.end) + 1
    }

    /// X offset of the left edge of `date`'s column.
    pub fn date_to_x(&self, date: NaiveDate) -> f32 {
        days_between(self.start, date) as f32 * self.day_width
    }

    /// Day whose column contains `x`.
    pub fn x_to_date(&self, x: f32) -> NaiveDate {
        let days = (x / self.day_width).floor() as i64;
        self.start + Duration::days(days)
    }

    /// Whole days for a horizontal pixel delta, rounded to nearest.
    pub fn pixels_to_days(&self, delta_x: f32) -> i64 {
        (delta_x / self.day_width).round() as i64
    }

    pub fn total_width(&self) -> f32 {
        self.day_count() as f32 * self.day_width
    }

    pub fn zoom_in(&mut self) {
        self.day_width = (self.day_width * 1.2).min(MAX_DAY_WIDTH);
    }

    pub fn zoom_out(&mut self) {
        self.day_width = (self.day_width / 1.2).max(MIN_DAY_WIDTH);
    }

    /// Scroll the viewport by a number of days.
    pub fn scroll_days(&mut self, days: i64) {
        self.start += Duration::days(days);
        self.end += Duration::days(days);
    }

    /// Fit the viewport around `span` with a margin of days on each side.
    pub fn fit(&mut self, span: DateInterval, padding_days: i64) {
        self.start = span.start() - Duration::days(padding_days);
        self.end = span.end() + Duration::days(padding_days);
    }
}
