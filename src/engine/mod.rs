//! Pointer-driven interval editing.
//!
//! Each interactive element owns a small state machine whose transitions are
//! plain functions of (state, event, context). Nothing here draws or talks to
//! storage: transitions return effects, and [`collab`] routes those effects to
//! whoever persists them.
//!
//! Times are seconds on a monotonic clock (egui's `input.time`), positions are
//! pixels along the axis the element is dragged on.

pub mod bar_drag;
pub mod block_drag;
pub mod collab;
pub mod layout;
pub mod slot_select;

use serde::{Deserialize, Serialize};

use crate::model::clock::{ClockTime, TimeInterval};

pub use bar_drag::{BarEffect, BarEvent, BarGesture, BarInteraction, BarTarget, BarTiming};
pub use block_drag::{
    BlockContext, BlockEffect, BlockEvent, BlockGesture, BlockInteraction, BlockTarget, BlockTiming,
};
pub use collab::{CommitOutcome, DetailTarget};
pub use slot_select::{SelectionEffect, SlotProposal, SlotSelector};

/// Which sibling collisions are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Moves are vetoed on overlap; resizes and new selections are not checked.
    #[default]
    MoveOnly,
    /// Moves, resizes and new selections are all checked.
    Uniform,
}

impl CollisionPolicy {
    pub fn checks_resize(self) -> bool {
        matches!(self, CollisionPolicy::Uniform)
    }

    pub fn checks_creation(self) -> bool {
        matches!(self, CollisionPolicy::Uniform)
    }
}

/// Geometry of the per-day slot grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotGrid {
    /// Opening time (top edge of slot 0).
    pub start: ClockTime,
    /// Closing time (bottom edge of the last slot).
    pub end: ClockTime,
    pub slot_minutes: u32,
    /// Height of one slot in pixels.
    pub slot_height: f32,
}

impl SlotGrid {
    pub fn slot_count(&self) -> usize {
        ((self.end.minutes() - self.start.minutes()) / self.slot_minutes.max(1)) as usize
    }

    pub fn total_height(&self) -> f32 {
        self.slot_count() as f32 * self.slot_height
    }

    /// Start time of slot `index`.
    pub fn slot_start(&self, index: usize) -> ClockTime {
        self.start
            .offset(index as i64 * self.slot_minutes as i64)
            .min(self.end)
    }

    /// Interval from the top of slot `first` to the bottom of slot `last`
    /// (inclusive, either order). `None` if either slot is off the grid.
    pub fn slot_span(&self, first: usize, last: usize) -> Option<TimeInterval> {
        let (lo, hi) = if first <= last { (first, last) } else { (last, first) };
        if hi >= self.slot_count() {
            return None;
        }
        TimeInterval::new(self.slot_start(lo), self.slot_start(hi + 1)).ok()
    }

    /// Slot index under a y offset from the grid top.
    pub fn slot_at_y(&self, y: f32) -> Option<usize> {
        if y < 0.0 || self.slot_height <= 0.0 {
            return None;
        }
        let index = (y / self.slot_height).floor() as usize;
        (index < self.slot_count()).then_some(index)
    }

    /// Whole slots for a vertical pixel delta, rounded to nearest.
    pub fn pixels_to_slots(&self, delta_y: f32) -> i64 {
        (delta_y / self.slot_height).round() as i64
    }

    pub fn contains(&self, interval: &TimeInterval) -> bool {
        interval.start() >= self.start && interval.end() <= self.end
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{iv, office_grid};

    #[test]
    fn test_slot_grid_geometry() {
        let grid = office_grid();
        assert_eq!(grid.slot_count(), 18);
        assert_eq!(grid.total_height(), 360.0);
        assert_eq!(grid.slot_start(4).to_string(), "11:00");
        assert_eq!(grid.slot_span(4, 7), Some(iv("11:00", "13:00")));
        assert_eq!(grid.slot_span(7, 4), Some(iv("11:00", "13:00")));
        assert_eq!(grid.slot_span(17, 17), Some(iv("17:30", "18:00")));
        assert_eq!(grid.slot_span(17, 18), None);
    }

    #[test]
    fn test_slot_hit_testing() {
        let grid = office_grid();
        assert_eq!(grid.slot_at_y(0.0), Some(0));
        assert_eq!(grid.slot_at_y(39.9), Some(1));
        assert_eq!(grid.slot_at_y(359.0), Some(17));
        assert_eq!(grid.slot_at_y(360.0), None);
        assert_eq!(grid.slot_at_y(-1.0), None);
        assert_eq!(grid.pixels_to_slots(29.0), 1);
        assert_eq!(grid.pixels_to_slots(-31.0), -2);
    }
}
