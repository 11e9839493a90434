//! Interval → pixel mapping for both views, plus hit-testing.
//!
//! Offsets are relative to the top of the slot grid or the left edge of the
//! visible timeline; callers add their own screen origin.

use super::bar_drag::BarTarget;
use super::block_drag::BlockTarget;
use super::SlotGrid;
use crate::model::clock::TimeInterval;
use crate::model::dates::{days_between, DateInterval};
use crate::model::timeline::TimelineViewport;

/// Vertical placement of a block inside its column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotRect {
    pub top: f32,
    pub height: f32,
}

impl SlotRect {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn contains_y(&self, y: f32) -> bool {
        y >= self.top && y <= self.bottom()
    }
}

/// Horizontal placement of a bar on the timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarSpan {
    pub left: f32,
    pub width: f32,
}

impl BarSpan {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.left && x <= self.right()
    }
}

/// Place a time interval on the slot grid.
pub fn block_rect(interval: &TimeInterval, grid: &SlotGrid) -> SlotRect {
    let slot = grid.slot_minutes.max(1) as f32;
    let from_start = interval.start().minutes() as f32 - grid.start.minutes() as f32;
    SlotRect {
        top: from_start / slot * grid.slot_height,
        height: interval.duration_minutes() as f32 / slot * grid.slot_height,
    }
}

/// Place a date interval on the timeline, clipped to the visible days.
/// `None` when the interval lies entirely outside them.
pub fn bar_span(interval: &DateInterval, viewport: &TimelineViewport) -> Option<BarSpan> {
    if !interval.intersects(&viewport.range()) {
        return None;
    }
    let start = interval.start().max(viewport.start);
    let end = interval.end().min(viewport.end);
    Some(BarSpan {
        left: days_between(viewport.start, start) as f32 * viewport.day_width,
        width: ((days_between(start, end) + 1) as f32 * viewport.day_width - viewport.bar_margin)
            .max(0.0),
    })
}

/// Which part of a block a pointer at `y` lands on. Handles are `handle`
/// pixels tall, shrunk for blocks too short to fit both plus a body.
pub fn block_target_at(rect: &SlotRect, y: f32, handle: f32) -> Option<BlockTarget> {
    if !rect.contains_y(y) {
        return None;
    }
    let handle = handle.min(rect.height / 3.0);
    Some(if y <= rect.top + handle {
        BlockTarget::TopEdge
    } else if y >= rect.bottom() - handle {
        BlockTarget::BottomEdge
    } else {
        BlockTarget::Body
    })
}

/// Which part of a bar a pointer at `x` lands on.
pub fn bar_target_at(span: &BarSpan, x: f32, handle: f32) -> Option<BarTarget> {
    if !span.contains_x(x) {
        return None;
    }
    let handle = handle.min(span.width / 3.0);
    Some(if x <= span.left + handle {
        BarTarget::LeftEdge
    } else if x >= span.right() - handle {
        BarTarget::RightEdge
    } else {
        BarTarget::Body
    })
}
