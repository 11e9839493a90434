//! Edge resize and long-press move for a task bar on the Gantt timeline.
//!
//! Same shape as the block engine, but on a continuous day axis: pixel
//! deltas round to whole days, there is no collision checking (bars may
//! overlap), and a move is clamped to the visible days.

use tracing::{debug, info};
use uuid::Uuid;

use super::layout::{bar_span, BarSpan};
use crate::model::dates::DateInterval;
use crate::model::timeline::TimelineViewport;

/// Part of a bar under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarTarget {
    LeftEdge,
    RightEdge,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalHandle {
    Left,
    Right,
}

/// Raw pointer input for one bar. `x` is a timeline pixel offset; `time`
/// is in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BarEvent {
    Press { target: BarTarget, x: f32, time: f64 },
    Move { x: f32, time: f64 },
    Tick { time: f64 },
    Leave { time: f64 },
    Release { x: f32, time: f64 },
}

impl BarEvent {
    fn time(&self) -> f64 {
        match *self {
            BarEvent::Press { time, .. }
            | BarEvent::Move { time, .. }
            | BarEvent::Tick { time }
            | BarEvent::Leave { time }
            | BarEvent::Release { time, .. } => time,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarTiming {
    /// Seconds a body press must be held before it becomes a move.
    pub arm_delay: f64,
    /// Seconds after a drag ends during which a release is not a click.
    pub click_suppress: f64,
}

impl Default for BarTiming {
    fn default() -> Self {
        Self {
            arm_delay: 0.3,
            click_suppress: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BarContext<'a> {
    pub viewport: &'a TimelineViewport,
    pub timing: BarTiming,
    /// Releases before this time never count as clicks.
    pub click_blocked_until: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BarGesture {
    #[default]
    Idle,
    ArmedForMove {
        pressed_at: f64,
        anchor_x: f32,
    },
    Moving {
        anchor_x: f32,
        live: DateInterval,
    },
    Resizing {
        handle: HorizontalHandle,
        anchor_x: f32,
        live: DateInterval,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarEffect {
    Commit {
        task_id: Uuid,
        dates: DateInterval,
        previous: DateInterval,
    },
    OpenDetail {
        task_id: Uuid,
    },
}

impl BarGesture {
    pub fn step(
        self,
        task_id: Uuid,
        committed: &DateInterval,
        event: BarEvent,
        ctx: &BarContext<'_>,
    ) -> (BarGesture, Option<BarEffect>) {
        let vp = ctx.viewport;
        match (self, event) {
            (BarGesture::Idle, BarEvent::Press { target, x, time }) => {
                let gesture = match target {
                    BarTarget::LeftEdge => BarGesture::Resizing {
                        handle: HorizontalHandle::Left,
                        anchor_x: x,
                        live: *committed,
                    },
                    BarTarget::RightEdge => BarGesture::Resizing {
                        handle: HorizontalHandle::Right,
                        anchor_x: x,
                        live: *committed,
                    },
                    BarTarget::Body => BarGesture::ArmedForMove {
                        pressed_at: time,
                        anchor_x: x,
                    },
                };
                (gesture, None)
            }
            (BarGesture::Idle, _) => (BarGesture::Idle, None),

            (BarGesture::ArmedForMove { pressed_at, anchor_x }, event) => {
                let armed = event.time() - pressed_at >= ctx.timing.arm_delay;
                match event {
                    BarEvent::Leave { .. } if !armed => (BarGesture::Idle, None),
                    BarEvent::Release { time, .. } if !armed => {
                        let effect = (time >= ctx.click_blocked_until)
                            .then_some(BarEffect::OpenDetail { task_id });
                        (BarGesture::Idle, effect)
                    }
                    _ if !armed => (self, None),
                    _ => {
                        debug!(%task_id, "arm delay elapsed; moving bar");
                        BarGesture::Moving {
                            anchor_x,
                            live: *committed,
                        }
                        .step(task_id, committed, event, ctx)
                    }
                }
            }

            (BarGesture::Moving { anchor_x, .. }, BarEvent::Move { x, .. }) => {
                let live = committed.shifted_within(vp.pixels_to_days(x - anchor_x), &vp.range());
                (BarGesture::Moving { anchor_x, live }, None)
            }
            (BarGesture::Moving { anchor_x, .. }, BarEvent::Release { x, .. }) => {
                let live = committed.shifted_within(vp.pixels_to_days(x - anchor_x), &vp.range());
                (BarGesture::Idle, finish(task_id, committed, live))
            }

            (BarGesture::Resizing { handle, anchor_x, .. }, BarEvent::Move { x, .. }) => {
                let live = resized(committed, handle, vp.pixels_to_days(x - anchor_x));
                (
                    BarGesture::Resizing {
                        handle,
                        anchor_x,
                        live,
                    },
                    None,
                )
            }
            (BarGesture::Resizing { handle, anchor_x, .. }, BarEvent::Release { x, .. }) => {
                let live = resized(committed, handle, vp.pixels_to_days(x - anchor_x));
                (BarGesture::Idle, finish(task_id, committed, live))
            }

            (gesture, _) => (gesture, None),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, BarGesture::Idle)
    }

    /// True once the press has turned into a move or resize.
    pub fn is_dragging(&self) -> bool {
        matches!(self, BarGesture::Moving { .. } | BarGesture::Resizing { .. })
    }

    pub fn live(&self) -> Option<DateInterval> {
        match *self {
            BarGesture::Moving { live, .. } | BarGesture::Resizing { live, .. } => Some(live),
            _ => None,
        }
    }
}

fn resized(committed: &DateInterval, handle: HorizontalHandle, days: i64) -> DateInterval {
    match handle {
        HorizontalHandle::Left => committed.with_start_moved(days),
        HorizontalHandle::Right => committed.with_end_moved(days),
    }
}

fn finish(task_id: Uuid, committed: &DateInterval, live: DateInterval) -> Option<BarEffect> {
    (live != *committed).then_some(BarEffect::Commit {
        task_id,
        dates: live,
        previous: *committed,
    })
}

/// One bar's interactive state plus its committed dates.
#[derive(Debug, Clone)]
pub struct BarInteraction {
    task_id: Uuid,
    committed: DateInterval,
    gesture: BarGesture,
    click_blocked_until: f64,
    rollback: Option<DateInterval>,
}

impl BarInteraction {
    pub fn new(task_id: Uuid, committed: DateInterval) -> Self {
        Self {
            task_id,
            committed,
            gesture: BarGesture::Idle,
            click_blocked_until: f64::NEG_INFINITY,
            rollback: None,
        }
    }

    pub fn task_id(&self) -> Uuid {
        self.task_id
    }

    pub fn committed(&self) -> DateInterval {
        self.committed
    }

    pub fn gesture(&self) -> BarGesture {
        self.gesture
    }

    pub fn is_active(&self) -> bool {
        !self.gesture.is_idle()
    }

    pub fn live_dates(&self) -> DateInterval {
        self.gesture.live().unwrap_or(self.committed)
    }

    /// Where to draw the bar, or `None` if it is off screen.
    pub fn span(&self, viewport: &TimelineViewport) -> Option<BarSpan> {
        bar_span(&self.live_dates(), viewport)
    }

    /// True while a pointer-up at `time` would be swallowed rather than
    /// treated as a click.
    pub fn click_suppressed(&self, time: f64) -> bool {
        time < self.click_blocked_until
    }

    pub fn handle(
        &mut self,
        event: BarEvent,
        viewport: &TimelineViewport,
        timing: BarTiming,
    ) -> Option<BarEffect> {
        let ctx = BarContext {
            viewport,
            timing,
            click_blocked_until: self.click_blocked_until,
        };
        let was_dragging = self.gesture.is_dragging()
            || matches!(self.gesture, BarGesture::ArmedForMove { pressed_at, .. }
                if event.time() - pressed_at >= timing.arm_delay);
        let (next, effect) = self.gesture.step(self.task_id, &self.committed, event, &ctx);
        self.gesture = next;

        if was_dragging && next.is_idle() {
            self.click_blocked_until = event.time() + timing.click_suppress;
        }
        if let Some(BarEffect::Commit { dates, previous, .. }) = effect {
            info!(
                task_id = %self.task_id,
                start = %dates.start(),
                end = %dates.end(),
                "bar dates committed"
            );
            self.rollback = Some(previous);
            self.committed = dates;
        }
        effect
    }

    /// Apply the outcome of the last commit. Returns true if rolled back.
    pub fn settle(&mut self, committed_ok: bool) -> bool {
        match self.rollback.take() {
            Some(previous) if !committed_ok => {
                self.committed = previous;
                true
            }
            _ => false,
        }
    }

    pub fn sync(&mut self, committed: DateInterval) {
        if self.gesture.is_idle() {
            self.committed = committed;
        }
    }

    pub fn cancel(&mut self) {
        self.gesture = BarGesture::Idle;
    }
}
