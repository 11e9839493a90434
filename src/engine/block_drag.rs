//! Resize and long-press move for a block in the slot grid.
//!
//! ```text
//! Idle ──press edge──▶ Resizing(handle) ──release──▶ Idle
//! Idle ──press body──▶ ArmedForMove ──arm delay──▶ Dragging ──release──▶ Idle
//!                          │ release early: click
//!                          └ leave: cancel
//! ```
//!
//! Pointer deltas are snapped to whole slots. A move whose live interval
//! overlaps a sibling is vetoed on release and the block falls back to its
//! committed interval.

use tracing::{debug, info};
use uuid::Uuid;

use super::layout::{block_rect, SlotRect};
use super::{CollisionPolicy, SlotGrid};
use crate::model::clock::{ClockTime, TimeInterval};

/// Part of a block under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTarget {
    TopEdge,
    BottomEdge,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalHandle {
    Top,
    Bottom,
}

/// Raw pointer input for one block. `y` is in the same space as the grid's
/// pixel offsets; `time` is in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlockEvent {
    Press { target: BlockTarget, y: f32, time: f64 },
    Move { y: f32, time: f64 },
    /// Frame tick with no pointer movement; lets the arm delay elapse.
    Tick { time: f64 },
    /// Pointer left the block's bounds.
    Leave { time: f64 },
    Release { y: f32, time: f64 },
}

impl BlockEvent {
    fn time(&self) -> f64 {
        match *self {
            BlockEvent::Press { time, .. }
            | BlockEvent::Move { time, .. }
            | BlockEvent::Tick { time }
            | BlockEvent::Leave { time }
            | BlockEvent::Release { time, .. } => time,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockTiming {
    /// Seconds a body press must be held before it becomes a move.
    pub arm_delay: f64,
    pub policy: CollisionPolicy,
}

impl Default for BlockTiming {
    fn default() -> Self {
        Self {
            arm_delay: 0.15,
            policy: CollisionPolicy::MoveOnly,
        }
    }
}

/// Everything a transition may read besides the block itself.
#[derive(Debug, Clone, Copy)]
pub struct BlockContext<'a> {
    pub grid: &'a SlotGrid,
    /// Committed intervals of the other blocks in the same column.
    pub siblings: &'a [TimeInterval],
    pub timing: BlockTiming,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BlockGesture {
    #[default]
    Idle,
    ArmedForMove {
        pressed_at: f64,
        anchor_y: f32,
    },
    Dragging {
        anchor_y: f32,
        live: TimeInterval,
        blocked: bool,
    },
    Resizing {
        handle: VerticalHandle,
        anchor_y: f32,
        live: TimeInterval,
        blocked: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockEffect {
    /// The block now occupies `interval`; persist it.
    Commit {
        block_id: Uuid,
        interval: TimeInterval,
        previous: TimeInterval,
    },
    /// The gesture ended on an overlap and was thrown away.
    Vetoed {
        block_id: Uuid,
        attempted: TimeInterval,
    },
    /// Short press on the body: show the block's details.
    OpenDetail { block_id: Uuid },
}

impl BlockGesture {
    /// Advance the gesture by one event. `committed` is the block's interval
    /// before the gesture began.
    pub fn step(
        self,
        block_id: Uuid,
        committed: &TimeInterval,
        event: BlockEvent,
        ctx: &BlockContext<'_>,
    ) -> (BlockGesture, Option<BlockEffect>) {
        let grid = ctx.grid;
        match (self, event) {
            (BlockGesture::Idle, BlockEvent::Press { target, y, time }) => {
                let gesture = match target {
                    BlockTarget::TopEdge => BlockGesture::Resizing {
                        handle: VerticalHandle::Top,
                        anchor_y: y,
                        live: *committed,
                        blocked: false,
                    },
                    BlockTarget::BottomEdge => BlockGesture::Resizing {
                        handle: VerticalHandle::Bottom,
                        anchor_y: y,
                        live: *committed,
                        blocked: false,
                    },
                    BlockTarget::Body => BlockGesture::ArmedForMove {
                        pressed_at: time,
                        anchor_y: y,
                    },
                };
                (gesture, None)
            }
            (BlockGesture::Idle, _) => (BlockGesture::Idle, None),

            (BlockGesture::ArmedForMove { pressed_at, anchor_y }, event) => {
                let armed = event.time() - pressed_at >= ctx.timing.arm_delay;
                match event {
                    BlockEvent::Leave { .. } if !armed => {
                        debug!(%block_id, "pointer left before arm delay; move cancelled");
                        (BlockGesture::Idle, None)
                    }
                    BlockEvent::Release { .. } if !armed => {
                        (BlockGesture::Idle, Some(BlockEffect::OpenDetail { block_id }))
                    }
                    _ if !armed => (self, None),
                    _ => {
                        debug!(%block_id, "arm delay elapsed; dragging");
                        let dragging = BlockGesture::Dragging {
                            anchor_y,
                            live: *committed,
                            blocked: committed.collides_with(ctx.siblings),
                        };
                        dragging.step(block_id, committed, event, ctx)
                    }
                }
            }

            (BlockGesture::Dragging { anchor_y, .. }, BlockEvent::Move { y, .. }) => {
                let live = moved(committed, grid.pixels_to_slots(y - anchor_y), grid);
                let blocked = live.collides_with(ctx.siblings);
                (BlockGesture::Dragging { anchor_y, live, blocked }, None)
            }
            (BlockGesture::Dragging { anchor_y, .. }, BlockEvent::Release { y, .. }) => {
                let live = moved(committed, grid.pixels_to_slots(y - anchor_y), grid);
                let blocked = live.collides_with(ctx.siblings);
                (BlockGesture::Idle, finish(block_id, committed, live, blocked))
            }

            (
                BlockGesture::Resizing { handle, anchor_y, .. },
                BlockEvent::Move { y, .. },
            ) => {
                let live = resized(committed, handle, grid.pixels_to_slots(y - anchor_y), grid);
                let blocked = ctx.timing.policy.checks_resize() && live.collides_with(ctx.siblings);
                (
                    BlockGesture::Resizing {
                        handle,
                        anchor_y,
                        live,
                        blocked,
                    },
                    None,
                )
            }
            (
                BlockGesture::Resizing { handle, anchor_y, .. },
                BlockEvent::Release { y, .. },
            ) => {
                let live = resized(committed, handle, grid.pixels_to_slots(y - anchor_y), grid);
                let blocked = ctx.timing.policy.checks_resize() && live.collides_with(ctx.siblings);
                (BlockGesture::Idle, finish(block_id, committed, live, blocked))
            }

            // Presses, ticks and leaves do not change an active drag or resize.
            (gesture, _) => (gesture, None),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, BlockGesture::Idle)
    }

    pub fn live(&self) -> Option<TimeInterval> {
        match *self {
            BlockGesture::Dragging { live, .. } | BlockGesture::Resizing { live, .. } => Some(live),
            _ => None,
        }
    }

    pub fn blocked(&self) -> bool {
        match *self {
            BlockGesture::Dragging { blocked, .. } | BlockGesture::Resizing { blocked, .. } => blocked,
            _ => false,
        }
    }
}

fn finish(
    block_id: Uuid,
    committed: &TimeInterval,
    live: TimeInterval,
    blocked: bool,
) -> Option<BlockEffect> {
    if live == *committed {
        None
    } else if blocked {
        Some(BlockEffect::Vetoed {
            block_id,
            attempted: live,
        })
    } else {
        Some(BlockEffect::Commit {
            block_id,
            interval: live,
            previous: *committed,
        })
    }
}

fn at(minutes: i64) -> ClockTime {
    ClockTime::MIDNIGHT.offset(minutes)
}

/// Shift `committed` by whole slots, keeping its length. The shift stops at
/// the grid edges but never pulls a block that already sits outside the
/// grid any further in or out.
pub fn moved(committed: &TimeInterval, slots: i64, grid: &SlotGrid) -> TimeInterval {
    let start = committed.start().minutes() as i64;
    let end = committed.end().minutes() as i64;
    let offset = slots * grid.slot_minutes as i64;
    let offset = if offset > 0 {
        offset.min((grid.end.minutes() as i64 - end).max(0))
    } else {
        offset.max((grid.start.minutes() as i64 - start).min(0))
    };
    if offset == 0 {
        return *committed;
    }
    TimeInterval::new(at(start + offset), at(end + offset)).unwrap_or(*committed)
}

/// Move one edge of `committed` by whole slots. The edge stays at least one
/// slot away from the other edge and does not cross a grid edge it started
/// inside of.
pub fn resized(
    committed: &TimeInterval,
    handle: VerticalHandle,
    slots: i64,
    grid: &SlotGrid,
) -> TimeInterval {
    if slots == 0 {
        return *committed;
    }
    let slot = grid.slot_minutes as i64;
    let start = committed.start().minutes() as i64;
    let end = committed.end().minutes() as i64;
    let delta = slots * slot;
    let (start, end) = match handle {
        VerticalHandle::Top => {
            let floor = start.min(grid.start.minutes() as i64);
            let new_start = (start + delta).min(end - slot).max(floor);
            (new_start, end)
        }
        VerticalHandle::Bottom => {
            let ceiling = end.max(grid.end.minutes() as i64);
            let new_end = (end + delta).max(start + slot).min(ceiling);
            (start, new_end)
        }
    };
    TimeInterval::new(at(start), at(end)).unwrap_or(*committed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::{iv, office_grid};

    const SLOT_PX: f32 = 20.0;

    fn ctx<'a>(grid: &'a SlotGrid, siblings: &'a [TimeInterval]) -> BlockContext<'a> {
        BlockContext {
            grid,
            siblings,
            timing: BlockTiming::default(),
        }
    }

    #[test]
    fn test_short_press_opens_detail() {
        let grid = office_grid();
        let mut block = BlockInteraction::new(Uuid::new_v4(), iv("10:00", "11:00"));
        let c = ctx(&grid, &[]);
        assert_eq!(
            block.handle(BlockEvent::Press { target: BlockTarget::Body, y: 30.0, time: 1.0 }, &c),
            None
        );
        let effect = block.handle(BlockEvent::Release { y: 30.0, time: 1.1 }, &c);
        assert_eq!(effect, Some(BlockEffect::OpenDetail { block_id: block.block_id() }));
        assert!(!block.is_active());
    }

    #[test]
    fn test_leave_before_arm_cancels() {
        let grid = office_grid();
        let mut block = BlockInteraction::new(Uuid::new_v4(), iv("10:00", "11:00"));
        let c = ctx(&grid, &[]);
        block.handle(BlockEvent::Press { target: BlockTarget::Body, y: 30.0, time: 1.0 }, &c);
        block.handle(BlockEvent::Leave { time: 1.05 }, &c);
        assert_eq!(block.gesture(), BlockGesture::Idle);
        // The timer is gone: a late tick does not start a drag.
        block.handle(BlockEvent::Tick { time: 2.0 }, &c);
        assert_eq!(block.gesture(), BlockGesture::Idle);
    }

    #[test]
    fn test_move_commits_whole_slots() {
        let grid = office_grid();
        let mut block = BlockInteraction::new(Uuid::new_v4(), iv("10:00", "11:00"));
        let c = ctx(&grid, &[]);
        block.handle(BlockEvent::Press { target: BlockTarget::Body, y: 50.0, time: 0.0 }, &c);
        block.handle(BlockEvent::Tick { time: 0.2 }, &c);
        assert!(matches!(block.gesture(), BlockGesture::Dragging { .. }));

        block.handle(BlockEvent::Move { y: 50.0 + 2.6 * SLOT_PX, time: 0.3 }, &c);
        assert_eq!(block.live_interval(), iv("11:30", "12:30"));

        let effect = block.handle(BlockEvent::Release { y: 50.0 + 2.6 * SLOT_PX, time: 0.4 }, &c);
        assert!(matches!(effect, Some(BlockEffect::Commit { interval, .. }) if interval == iv("11:30", "12:30")));
        assert_eq!(block.committed(), iv("11:30", "12:30"));
        assert_eq!(block.committed().start().minutes() % 30, 0);
    }

    #[test]
    fn test_move_onto_sibling_is_vetoed() {
        let grid = office_grid();
        let siblings = [iv("11:30", "12:00")];
        let mut block = BlockInteraction::new(Uuid::new_v4(), iv("10:00", "11:00"));
        let c = ctx(&grid, &siblings);
        block.handle(BlockEvent::Press { target: BlockTarget::Body, y: 50.0, time: 0.0 }, &c);
        block.handle(BlockEvent::Move { y: 50.0 + 2.0 * SLOT_PX, time: 0.2 }, &c);
        assert!(block.is_blocked());

        let effect = block.handle(BlockEvent::Release { y: 50.0 + 2.0 * SLOT_PX, time: 0.3 }, &c);
        assert!(matches!(effect, Some(BlockEffect::Vetoed { .. })));
        assert_eq!(block.committed(), iv("10:00", "11:00"));
        assert_eq!(block.live_interval(), iv("10:00", "11:00"));
        assert!(!block.is_blocked());
    }

    #[test]
    fn test_move_clamps_without_shrinking() {
        let grid = office_grid();
        let mut block = BlockInteraction::new(Uuid::new_v4(), iv("16:00", "17:30"));
        let c = ctx(&grid, &[]);
        block.handle(BlockEvent::Press { target: BlockTarget::Body, y: 150.0, time: 0.0 }, &c);
        block.handle(BlockEvent::Move { y: 150.0 + 10.0 * SLOT_PX, time: 0.5 }, &c);
        assert_eq!(block.live_interval(), iv("16:30", "18:00"));

        block.handle(BlockEvent::Move { y: 150.0 - 40.0 * SLOT_PX, time: 0.6 }, &c);
        assert_eq!(block.live_interval(), iv("09:00", "10:30"));
    }

    #[test]
    fn test_zero_delta_drag_commits_nothing() {
        let grid = office_grid();
        let mut block = BlockInteraction::new(Uuid::new_v4(), iv("10:00", "11:00"));
        let c = ctx(&grid, &[]);
        block.handle(BlockEvent::Press { target: BlockTarget::Body, y: 50.0, time: 0.0 }, &c);
        block.handle(BlockEvent::Move { y: 110.0, time: 0.3 }, &c);
        block.handle(BlockEvent::Move { y: 52.0, time: 0.4 }, &c);
        assert_eq!(block.handle(BlockEvent::Release { y: 52.0, time: 0.5 }, &c), None);

        block.handle(BlockEvent::Press { target: BlockTarget::BottomEdge, y: 78.0, time: 1.0 }, &c);
        block.handle(BlockEvent::Move { y: 140.0, time: 1.1 }, &c);
        assert_eq!(block.handle(BlockEvent::Release { y: 79.0, time: 1.2 }, &c), None);
    }

    #[test]
    fn test_block_before_opening_is_not_pulled_in() {
        let grid = office_grid();
        let early = iv("08:00", "09:30");
        let mut block = BlockInteraction::new(Uuid::new_v4(), early);
        let c = ctx(&grid, &[]);
        block.handle(BlockEvent::Press { target: BlockTarget::Body, y: 0.0, time: 0.0 }, &c);
        block.handle(BlockEvent::Tick { time: 0.3 }, &c);
        assert_eq!(block.live_interval(), early);
        assert_eq!(block.handle(BlockEvent::Release { y: 0.0, time: 0.4 }, &c), None);
        assert_eq!(block.committed(), early);

        // Moving further out is refused, moving later is allowed.
        assert_eq!(moved(&early, -2, &grid), early);
        assert_eq!(moved(&early, 2, &grid), iv("09:00", "10:30"));

        block.handle(BlockEvent::Press { target: BlockTarget::TopEdge, y: -20.0, time: 1.0 }, &c);
        assert_eq!(block.handle(BlockEvent::Release { y: -20.0, time: 1.1 }, &c), None);
        assert_eq!(resized(&early, VerticalHandle::Top, -1, &grid), early);
        assert_eq!(resized(&early, VerticalHandle::Top, 1, &grid), iv("08:30", "09:30"));
    }

    #[test]
    fn test_resize_bottom_clamps_to_closing_time() {
        let grid = office_grid();
        let mut block = BlockInteraction::new(Uuid::new_v4(), iv("16:00", "17:00"));
        let c = ctx(&grid, &[]);
        block.handle(BlockEvent::Press { target: BlockTarget::BottomEdge, y: 160.0, time: 0.0 }, &c);
        let effect = block.handle(BlockEvent::Release { y: 160.0 + 8.0 * SLOT_PX, time: 0.1 }, &c);
        assert!(matches!(effect, Some(BlockEffect::Commit { interval, .. }) if interval.end().to_string() == "18:00"));
    }

    #[test]
    fn test_resize_keeps_one_slot() {
        let grid = office_grid();
        let mut block = BlockInteraction::new(Uuid::new_v4(), iv("10:00", "11:00"));
        let c = ctx(&grid, &[]);
        block.handle(BlockEvent::Press { target: BlockTarget::TopEdge, y: 40.0, time: 0.0 }, &c);
        block.handle(BlockEvent::Move { y: 40.0 + 5.0 * SLOT_PX, time: 0.1 }, &c);
        assert_eq!(block.live_interval(), iv("10:30", "11:00"));
        block.handle(BlockEvent::Move { y: 40.0 - 9.0 * SLOT_PX, time: 0.2 }, &c);
        assert_eq!(block.live_interval(), iv("09:00", "11:00"));
        block.cancel();

        block.handle(BlockEvent::Press { target: BlockTarget::BottomEdge, y: 80.0, time: 1.0 }, &c);
        block.handle(BlockEvent::Move { y: 80.0 - 6.0 * SLOT_PX, time: 1.1 }, &c);
        assert_eq!(block.live_interval(), iv("10:00", "10:30"));
    }

    #[test]
    fn test_resize_collision_follows_policy() {
        let grid = office_grid();
        let siblings = [iv("11:30", "12:00")];
        let mut relaxed = BlockInteraction::new(Uuid::new_v4(), iv("10:00", "11:00"));
        let c = ctx(&grid, &siblings);
        relaxed.handle(BlockEvent::Press { target: BlockTarget::BottomEdge, y: 80.0, time: 0.0 }, &c);
        assert!(!relaxed.is_blocked());
        let effect = relaxed.handle(BlockEvent::Release { y: 80.0 + 2.0 * SLOT_PX, time: 0.1 }, &c);
        assert!(matches!(effect, Some(BlockEffect::Commit { .. })));

        let strict_ctx = BlockContext {
            timing: BlockTiming {
                policy: CollisionPolicy::Uniform,
                ..BlockTiming::default()
            },
            ..c
        };
        let mut strict = BlockInteraction::new(Uuid::new_v4(), iv("10:00", "11:00"));
        strict.handle(BlockEvent::Press { target: BlockTarget::BottomEdge, y: 80.0, time: 0.0 }, &strict_ctx);
        strict.handle(BlockEvent::Move { y: 80.0 + 2.0 * SLOT_PX, time: 0.1 }, &strict_ctx);
        assert!(strict.is_blocked());
        let effect = strict.handle(BlockEvent::Release { y: 80.0 + 2.0 * SLOT_PX, time: 0.2 }, &strict_ctx);
        assert!(matches!(effect, Some(BlockEffect::Vetoed { .. })));
        assert_eq!(strict.committed(), iv("10:00", "11:00"));
    }

    #[test]
    fn test_failed_commit_rolls_back() {
        let grid = office_grid();
        let mut block = BlockInteraction::new(Uuid::new_v4(), iv("10:00", "11:00"));
        let c = ctx(&grid, &[]);
        block.handle(BlockEvent::Press { target: BlockTarget::TopEdge, y: 40.0, time: 0.0 }, &c);
        block.handle(BlockEvent::Release { y: 40.0 - SLOT_PX, time: 0.1 }, &c);
        assert_eq!(block.committed(), iv("09:30", "11:00"));
        assert!(block.settle(false));
        assert_eq!(block.committed(), iv("10:00", "11:00"));
        // Nothing left to roll back.
        assert!(!block.settle(false));
    }

    #[test]
    fn test_second_press_is_ignored_mid_gesture() {
        let grid = office_grid();
        let mut block = BlockInteraction::new(Uuid::new_v4(), iv("10:00", "11:00"));
        let c = ctx(&grid, &[]);
        block.handle(BlockEvent::Press { target: BlockTarget::TopEdge, y: 40.0, time: 0.0 }, &c);
        block.handle(BlockEvent::Press { target: BlockTarget::Body, y: 60.0, time: 0.1 }, &c);
        assert!(matches!(
            block.gesture(),
            BlockGesture::Resizing { handle: VerticalHandle::Top, .. }
        ));
    }
}
