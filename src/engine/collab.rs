//! Contracts with the code that owns and persists scheduling data, and the
//! glue that routes engine effects to it.

use chrono::NaiveDate;
use tracing::warn;
use uuid::Uuid;

use super::bar_drag::{BarEffect, BarInteraction};
use super::block_drag::{BlockEffect, BlockInteraction};
use super::slot_select::{SelectionEffect, SlotProposal};
use crate::model::clock::{ClockTime, TimeInterval};

/// Result of persisting a committed interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    Failed(String),
}

impl CommitOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, CommitOutcome::Committed)
    }
}

/// Entity whose detail view should be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailTarget {
    Block(Uuid),
    Task(Uuid),
}

/// Committed intervals of the other blocks in a resource's column.
pub trait SiblingIntervals {
    fn sibling_intervals(
        &self,
        resource_id: Uuid,
        day: NaiveDate,
        exclude_block: Option<Uuid>,
    ) -> Vec<TimeInterval>;
}

pub trait BlockCommitter {
    fn commit_block(&mut self, block_id: Uuid, start: ClockTime, end: ClockTime) -> CommitOutcome;
}

pub trait BarCommitter {
    fn commit_bar(&mut self, task_id: Uuid, start: NaiveDate, end: NaiveDate) -> CommitOutcome;
}

pub trait CreationFlow {
    fn open_creation(&mut self, day: NaiveDate, proposal: SlotProposal);
}

pub trait DetailView {
    fn open_detail(&mut self, target: DetailTarget);
}

/// Route a block effect. Commits are settled back into `block`, rolling it
/// back if persistence fails. Returns the commit outcome, if any.
pub fn apply_block_effect<S>(
    block: &mut BlockInteraction,
    effect: BlockEffect,
    sink: &mut S,
) -> Option<CommitOutcome>
where
    S: BlockCommitter + DetailView,
{
    match effect {
        BlockEffect::Commit {
            block_id, interval, ..
        } => {
            let outcome = sink.commit_block(block_id, interval.start(), interval.end());
            if block.settle(outcome.is_ok()) {
                warn!(%block_id, ?outcome, "block commit failed; rolled back");
            }
            Some(outcome)
        }
        BlockEffect::OpenDetail { block_id } => {
            sink.open_detail(DetailTarget::Block(block_id));
            None
        }
        BlockEffect::Vetoed { .. } => None,
    }
}

/// Route a bar effect; see [`apply_block_effect`].
pub fn apply_bar_effect<S>(
    bar: &mut BarInteraction,
    effect: BarEffect,
    sink: &mut S,
) -> Option<CommitOutcome>
where
    S: BarCommitter + DetailView,
{
    match effect {
        BarEffect::Commit { task_id, dates, .. } => {
            let outcome = sink.commit_bar(task_id, dates.start(), dates.end());
            if bar.settle(outcome.is_ok()) {
                warn!(%task_id, ?outcome, "bar commit failed; rolled back");
            }
            Some(outcome)
        }
        BarEffect::OpenDetail { task_id } => {
            sink.open_detail(DetailTarget::Task(task_id));
            None
        }
    }
}

/// Hand a finished selection to the creation flow. Returns true if it was
/// handed over.
pub fn apply_selection_effect<S: CreationFlow>(
    day: NaiveDate,
    effect: SelectionEffect,
    sink: &mut S,
) -> bool {
    match effect {
        SelectionEffect::Propose(proposal) => {
            sink.open_creation(day, proposal);
            true
        }
        SelectionEffect::Rejected(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::block_drag::{BlockContext, BlockEvent, BlockTarget, BlockTiming};
    use crate::engine::test_support::{iv, office_grid};

    #[derive(Default)]
    struct Recorder {
        commits: Vec<(Uuid, ClockTime, ClockTime)>,
        details: Vec<DetailTarget>,
        fail: bool,
    }

    impl BlockCommitter for Recorder {
        fn commit_block(&mut self, block_id: Uuid, start: ClockTime, end: ClockTime) -> CommitOutcome {
            self.commits.push((block_id, start, end));
            if self.fail {
                CommitOutcome::Failed("offline".into())
            } else {
                CommitOutcome::Committed
            }
        }
    }

    impl DetailView for Recorder {
        fn open_detail(&mut self, target: DetailTarget) {
            self.details.push(target);
        }
    }

    fn resize_by_one_slot(block: &mut BlockInteraction) -> BlockEffect {
        let grid = office_grid();
        let ctx = BlockContext {
            grid: &grid,
            siblings: &[],
            timing: BlockTiming::default(),
        };
        block.handle(BlockEvent::Press { target: BlockTarget::BottomEdge, y: 78.0, time: 0.0 }, &ctx);
        block
            .handle(BlockEvent::Release { y: 98.0, time: 0.1 }, &ctx)
            .unwrap()
    }

    #[test]
    fn test_commit_reaches_sink_once() {
        let mut sink = Recorder::default();
        let mut block = BlockInteraction::new(Uuid::new_v4(), iv("10:00", "11:00"));
        let effect = resize_by_one_slot(&mut block);
        assert_eq!(apply_block_effect(&mut block, effect, &mut sink), Some(CommitOutcome::Committed));
        assert_eq!(sink.commits.len(), 1);
        assert_eq!(sink.commits[0].2.to_string(), "11:30");
        assert_eq!(block.committed(), iv("10:00", "11:30"));
    }

    #[test]
    fn test_failed_commit_reverts_block() {
        let mut sink = Recorder {
            fail: true,
            ..Recorder::default()
        };
        let mut block = BlockInteraction::new(Uuid::new_v4(), iv("10:00", "11:00"));
        let effect = resize_by_one_slot(&mut block);
        let outcome = apply_block_effect(&mut block, effect, &mut sink);
        assert!(matches!(outcome, Some(CommitOutcome::Failed(_))));
        assert_eq!(block.committed(), iv("10:00", "11:00"));
    }

    #[test]
    fn test_detail_routing() {
        let mut sink = Recorder::default();
        let id = Uuid::new_v4();
        let mut block = BlockInteraction::new(id, iv("10:00", "11:00"));
        apply_block_effect(&mut block, BlockEffect::OpenDetail { block_id: id }, &mut sink);
        assert_eq!(sink.details, vec![DetailTarget::Block(id)]);
        assert!(sink.commits.is_empty());
    }
}
