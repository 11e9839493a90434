//! Drag-to-select over a resource column's slots.
//!
//! The selector only proposes an interval; creating the block is left to the
//! creation flow it hands the proposal to.

use std::ops::RangeInclusive;

use tracing::debug;
use uuid::Uuid;

use super::{CollisionPolicy, SlotGrid};
use crate::model::clock::TimeInterval;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Selecting {
        resource_id: Uuid,
        start_slot: usize,
        /// Set by the first pointer-enter in the same column.
        end_slot: Option<usize>,
    },
}

/// A completed selection for one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotProposal {
    pub resource_id: Uuid,
    pub interval: TimeInterval,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEffect {
    /// Hand the proposal to the creation flow.
    Propose(SlotProposal),
    /// The proposal overlaps an existing block and collisions are enforced
    /// on creation.
    Rejected(SlotProposal),
}

#[derive(Debug, Clone, Default)]
pub struct SlotSelector {
    state: SelectionState,
}

impl SlotSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn is_selecting(&self) -> bool {
        matches!(self.state, SelectionState::Selecting { .. })
    }

    /// Column the current selection belongs to.
    pub fn active_resource(&self) -> Option<Uuid> {
        match self.state {
            SelectionState::Selecting { resource_id, .. } => Some(resource_id),
            SelectionState::Idle => None,
        }
    }

    /// Pointer pressed on a cell.
    pub fn press(&mut self, resource_id: Uuid, slot: usize) {
        self.state = SelectionState::Selecting {
            resource_id,
            start_slot: slot,
            end_slot: None,
        };
    }

    /// Pointer entered a cell. Cells in other columns are ignored.
    pub fn enter(&mut self, resource: Uuid, slot: usize) {
        if let SelectionState::Selecting {
            resource_id,
            end_slot,
            ..
        } = &mut self.state
        {
            if *resource_id == resource {
                *end_slot = Some(slot);
            }
        }
    }

    /// Pointer released. Returns the proposal for a completed drag; a release
    /// that never entered a cell is dropped silently.
    pub fn release(
        &mut self,
        grid: &SlotGrid,
        siblings: &[TimeInterval],
        policy: CollisionPolicy,
    ) -> Option<SelectionEffect> {
        let state = std::mem::take(&mut self.state);
        let SelectionState::Selecting {
            resource_id,
            start_slot,
            end_slot: Some(end_slot),
        } = state
        else {
            return None;
        };

        let interval = grid.slot_span(start_slot, end_slot)?;
        let proposal = SlotProposal {
            resource_id,
            interval,
        };
        if policy.checks_creation() && interval.collides_with(siblings) {
            debug!(%resource_id, %interval, "selection overlaps an existing block");
            return Some(SelectionEffect::Rejected(proposal));
        }
        debug!(%resource_id, %interval, "selection proposed");
        Some(SelectionEffect::Propose(proposal))
    }

    /// Drop any selection in progress.
    pub fn cancel(&mut self) {
        self.state = SelectionState::Idle;
    }

    /// Slots currently highlighted in `resource`'s column.
    pub fn selected_range(&self, resource: Uuid) -> Option<RangeInclusive<usize>> {
        match self.state {
            SelectionState::Selecting {
                resource_id,
                start_slot,
                end_slot,
            } if resource_id == resource => {
                let end = end_slot.unwrap_or(start_slot);
                Some(start_slot.min(end)..=start_slot.max(end))
            }
            _ => None,
        }
    }

    pub fn is_selected(&self, resource: Uuid, slot: usize) -> bool {
        self.selected_range(resource)
            .is_some_and(|range| range.contains(&slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::{iv, office_grid};

    #[test]
    fn test_drag_from_slot_4_to_7() {
        let grid = office_grid();
        let alice = Uuid::new_v4();
        let mut sel = SlotSelector::new();

        sel.press(alice, 4);
        sel.enter(alice, 5);
        sel.enter(alice, 6);
        sel.enter(alice, 7);
        assert!(sel.is_selected(alice, 4));
        assert!(sel.is_selected(alice, 7));
        assert!(!sel.is_selected(alice, 8));

        let effect = sel.release(&grid, &[], CollisionPolicy::MoveOnly);
        assert_eq!(
            effect,
            Some(SelectionEffect::Propose(SlotProposal {
                resource_id: alice,
                interval: iv("11:00", "13:00"),
            }))
        );
        assert_eq!(sel.state(), SelectionState::Idle);
    }

    #[test]
    fn test_upward_drag_is_sorted() {
        let grid = office_grid();
        let alice = Uuid::new_v4();
        let mut sel = SlotSelector::new();
        sel.press(alice, 7);
        sel.enter(alice, 4);
        assert_eq!(sel.selected_range(alice), Some(4..=7));
        let Some(SelectionEffect::Propose(p)) = sel.release(&grid, &[], CollisionPolicy::MoveOnly)
        else {
            panic!("expected a proposal");
        };
        assert_eq!(p.interval, iv("11:00", "13:00"));
    }

    #[test]
    fn test_release_without_enter_is_discarded() {
        let grid = office_grid();
        let alice = Uuid::new_v4();
        let mut sel = SlotSelector::new();
        sel.press(alice, 3);
        assert_eq!(sel.release(&grid, &[], CollisionPolicy::MoveOnly), None);
        assert!(!sel.is_selecting());
    }

    #[test]
    fn test_other_columns_are_ignored() {
        let grid = office_grid();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let mut sel = SlotSelector::new();
        sel.press(alice, 2);
        sel.enter(bob, 9);
        assert_eq!(sel.selected_range(bob), None);
        assert_eq!(sel.selected_range(alice), Some(2..=2));
        assert_eq!(sel.release(&grid, &[], CollisionPolicy::MoveOnly), None);

        sel.press(alice, 2);
        sel.enter(alice, 3);
        sel.enter(bob, 9);
        let Some(SelectionEffect::Propose(p)) = sel.release(&grid, &[], CollisionPolicy::MoveOnly)
        else {
            panic!("expected a proposal");
        };
        assert_eq!(p.interval, iv("10:00", "11:00"));
    }

    #[test]
    fn test_collision_on_creation_follows_policy() {
        let grid = office_grid();
        let alice = Uuid::new_v4();
        let existing = [iv("11:30", "12:00")];
        let mut sel = SlotSelector::new();

        sel.press(alice, 4);
        sel.enter(alice, 7);
        assert!(matches!(
            sel.release(&grid, &existing, CollisionPolicy::MoveOnly),
            Some(SelectionEffect::Propose(_))
        ));

        sel.press(alice, 4);
        sel.enter(alice, 7);
        assert!(matches!(
            sel.release(&grid, &existing, CollisionPolicy::Uniform),
            Some(SelectionEffect::Rejected(_))
        ));
    }
}
