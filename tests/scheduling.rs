//! End-to-end gesture scenarios against a real board.

use chrono::NaiveDate;
use egui::Color32;
use uuid::Uuid;

use timeblock_board::config::SchedulerSettings;
use timeblock_board::engine::collab::{
    apply_bar_effect, apply_block_effect, apply_selection_effect, BarCommitter, BlockCommitter,
    CreationFlow, DetailView, SiblingIntervals,
};
use timeblock_board::engine::{
    BarEvent, BarInteraction, BarTarget, BlockContext, BlockEffect, BlockEvent, BlockInteraction,
    BlockTarget, CollisionPolicy, CommitOutcome, DetailTarget, SlotGrid, SlotProposal,
    SlotSelector,
};
use timeblock_board::model::{
    Board, ClockTime, DateInterval, Feature, Resource, Task, TimeInterval, TimelineViewport,
};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn iv(start: &str, end: &str) -> TimeInterval {
    TimeInterval::parse(start, end).unwrap()
}

/// 09:00–18:00 in 30 minute slots of 20 px.
fn grid() -> SlotGrid {
    SchedulerSettings {
        slot_height: 20.0,
        ..Default::default()
    }
    .slot_grid()
    .unwrap()
}

/// Board wrapper recording everything the engine hands it.
struct Harness {
    board: Board,
    created: Vec<(NaiveDate, SlotProposal)>,
    details: Vec<DetailTarget>,
    commits: usize,
}

impl Harness {
    fn new(board: Board) -> Self {
        Self {
            board,
            created: Vec::new(),
            details: Vec::new(),
            commits: 0,
        }
    }
}

impl BlockCommitter for Harness {
    fn commit_block(&mut self, block_id: Uuid, start: ClockTime, end: ClockTime) -> CommitOutcome {
        self.commits += 1;
        self.board.commit_block(block_id, start, end)
    }
}

impl BarCommitter for Harness {
    fn commit_bar(&mut self, task_id: Uuid, start: NaiveDate, end: NaiveDate) -> CommitOutcome {
        self.commits += 1;
        self.board.commit_bar(task_id, start, end)
    }
}

impl CreationFlow for Harness {
    fn open_creation(&mut self, day: NaiveDate, proposal: SlotProposal) {
        self.created.push((day, proposal));
    }
}

impl DetailView for Harness {
    fn open_detail(&mut self, target: DetailTarget) {
        self.details.push(target);
    }
}

/// Long-press the block's body, then drag it by `dy` pixels.
fn drag_block(
    harness: &mut Harness,
    block_id: Uuid,
    day: NaiveDate,
    grid: &SlotGrid,
    policy: CollisionPolicy,
    dy: f32,
) -> Option<BlockEffect> {
    let record = harness.board.block(block_id).unwrap().clone();
    let siblings = harness
        .board
        .sibling_intervals(record.resource_id, day, Some(block_id));
    let mut settings = SchedulerSettings::default();
    settings.collision_policy = policy;
    let ctx = BlockContext {
        grid,
        siblings: &siblings,
        timing: settings.block_timing(),
    };
    let mut block = BlockInteraction::new(block_id, record.interval);
    let y = 10.0;
    block.handle(BlockEvent::Press { target: BlockTarget::Body, y, time: 0.0 }, &ctx);
    block.handle(BlockEvent::Tick { time: 0.2 }, &ctx);
    block.handle(BlockEvent::Move { y: y + dy / 2.0, time: 0.25 }, &ctx);
    let effect = block.handle(BlockEvent::Release { y: y + dy, time: 0.3 }, &ctx);
    if let Some(effect) = effect {
        apply_block_effect(&mut block, effect, harness);
    }
    assert!(!block.is_active());
    assert_eq!(block.committed(), harness.board.block(block_id).unwrap().interval);
    effect
}

fn two_block_board(day: NaiveDate) -> (Board, Uuid, Uuid, Uuid) {
    let mut board = Board::new("Team");
    let alice = Resource::new("Alice", Color32::BLUE);
    let person = alice.id;
    board.resources.push(alice);
    let a = board.create_block(person, day, iv("10:00", "11:00"), None, "A");
    let b = board.create_block(person, day, iv("11:30", "12:00"), None, "B");
    (board, person, a, b)
}

#[test]
fn test_selection_hands_proposal_to_creation_flow() {
    let day = d("2025-06-02");
    let grid = grid();
    let mut harness = Harness::new(Board::new("Team"));
    let alice = Uuid::new_v4();

    let mut selector = SlotSelector::new();
    selector.press(alice, 4);
    for slot in 5..=7 {
        selector.enter(alice, slot);
    }
    let effect = selector
        .release(&grid, &[], CollisionPolicy::MoveOnly)
        .expect("completed selection");
    assert!(apply_selection_effect(day, effect, &mut harness));

    assert_eq!(harness.created.len(), 1);
    let (created_day, proposal) = harness.created[0];
    assert_eq!(created_day, day);
    assert_eq!(proposal.resource_id, alice);
    assert_eq!(proposal.interval, iv("11:00", "13:00"));
    assert!(harness.board.blocks.is_empty());

    let id = harness
        .board
        .create_block(alice, day, proposal.interval, None, "Design review");
    assert_eq!(harness.board.block(id).unwrap().interval, iv("11:00", "13:00"));
}

#[test]
fn test_drag_onto_neighbour_is_vetoed() {
    let day = d("2025-06-02");
    let grid = grid();
    let (board, _, a, b) = two_block_board(day);
    let mut harness = Harness::new(board);

    // 30 px is 1.5 slots and snaps to +1h: 11:00–12:00 overlaps B.
    let effect = drag_block(&mut harness, a, day, &grid, CollisionPolicy::MoveOnly, 30.0);
    assert_eq!(
        effect,
        Some(BlockEffect::Vetoed {
            block_id: a,
            attempted: iv("11:00", "12:00"),
        })
    );
    assert_eq!(harness.commits, 0);
    assert_eq!(harness.board.block(a).unwrap().interval, iv("10:00", "11:00"));
    assert_eq!(harness.board.block(b).unwrap().interval, iv("11:30", "12:00"));
}

#[test]
fn test_drag_into_free_time_commits_once() {
    let day = d("2025-06-02");
    let grid = grid();
    let (board, _, a, _) = two_block_board(day);
    let mut harness = Harness::new(board);

    let effect = drag_block(&mut harness, a, day, &grid, CollisionPolicy::MoveOnly, -20.0);
    assert!(matches!(effect, Some(BlockEffect::Commit { .. })));
    assert_eq!(harness.commits, 1);
    assert_eq!(harness.board.block(a).unwrap().interval, iv("09:30", "10:30"));

    // A drag that ends where it started is a no-op.
    let effect = drag_block(&mut harness, a, day, &grid, CollisionPolicy::MoveOnly, 4.0);
    assert_eq!(effect, None);
    assert_eq!(harness.commits, 1);
}

#[test]
fn test_bottom_handle_stops_at_closing_time() {
    let day = d("2025-06-02");
    let grid = grid();
    let mut board = Board::new("Team");
    let person = Uuid::new_v4();
    let id = board.create_block(person, day, iv("16:00", "17:00"), None, "Late");
    let mut harness = Harness::new(board);

    let ctx = BlockContext {
        grid: &grid,
        siblings: &[],
        timing: SchedulerSettings::default().block_timing(),
    };
    let mut block = BlockInteraction::new(id, iv("16:00", "17:00"));
    block.handle(BlockEvent::Press { target: BlockTarget::BottomEdge, y: 320.0, time: 0.0 }, &ctx);
    block.handle(BlockEvent::Move { y: 400.0, time: 0.1 }, &ctx);
    let effect = block
        .handle(BlockEvent::Release { y: 500.0, time: 0.2 }, &ctx)
        .expect("resize commits");
    apply_block_effect(&mut block, effect, &mut harness);

    assert_eq!(harness.board.block(id).unwrap().interval, iv("16:00", "18:00"));
}

#[test]
fn test_column_stays_collision_free_under_move_only() {
    let day = d("2025-06-02");
    let grid = grid();
    let mut board = Board::new("Team");
    let person = Uuid::new_v4();
    let ids = [
        board.create_block(person, day, iv("09:00", "10:00"), None, "one"),
        board.create_block(person, day, iv("10:30", "11:30"), None, "two"),
        board.create_block(person, day, iv("13:00", "14:30"), None, "three"),
        board.create_block(person, day, iv("16:00", "16:30"), None, "four"),
    ];
    let mut harness = Harness::new(board);

    let deltas = [35.0, -60.0, 80.0, 200.0, -400.0, 18.0, 41.0, -22.0, 120.0, -9.0];
    for (step, dy) in deltas.iter().enumerate() {
        let id = ids[step % ids.len()];
        drag_block(&mut harness, id, day, &grid, CollisionPolicy::MoveOnly, *dy);

        let column = harness.board.column(person, day);
        for (i, a) in column.iter().enumerate() {
            assert!(grid.contains(&a.interval));
            assert_eq!(a.interval.start().minutes() % 30, 0);
            assert_eq!(a.interval.end().minutes() % 30, 0);
            for b in &column[i + 1..] {
                assert!(!a.interval.overlaps(&b.interval), "{} overlaps {}", a.interval, b.interval);
            }
        }
    }
}

#[test]
fn test_gantt_resize_snaps_to_whole_days() {
    let mut board = Board::new("Plan");
    let feature = Feature::new("Billing", Color32::GOLD);
    let task = Task::new(feature.id, "Invoices", DateInterval::new(d("2025-06-02"), d("2025-06-04")).unwrap());
    let task_id = task.id;
    board.features.push(feature);
    board.tasks.push(task);
    let mut harness = Harness::new(board);

    let viewport = TimelineViewport::new(d("2025-06-01"), d("2025-06-30"), 60.0);
    let timing = SchedulerSettings::default().bar_timing();
    let mut bar = BarInteraction::new(task_id, harness.board.task(task_id).unwrap().dates);

    let x = viewport.date_to_x(d("2025-06-05")) - 2.0;
    bar.handle(BarEvent::Press { target: BarTarget::RightEdge, x, time: 0.0 }, &viewport, timing);
    bar.handle(BarEvent::Move { x: x + 60.0, time: 0.05 }, &viewport, timing);
    let effect = bar
        .handle(BarEvent::Release { x: x + 125.0, time: 0.1 }, &viewport, timing)
        .expect("resize commits");
    assert_eq!(apply_bar_effect(&mut bar, effect, &mut harness), Some(CommitOutcome::Committed));

    let dates = harness.board.task(task_id).unwrap().dates;
    assert_eq!(dates.start(), d("2025-06-02"));
    assert_eq!(dates.end(), d("2025-06-06"));
    // A click right after the drag does not open the task.
    assert!(bar.click_suppressed(0.15));
    assert!(harness.details.is_empty());
}

#[test]
fn test_short_bar_press_opens_task() {
    let mut board = Board::new("Plan");
    let task = Task::new(Uuid::new_v4(), "Docs", DateInterval::single(d("2025-06-10")));
    let task_id = task.id;
    board.tasks.push(task);
    let mut harness = Harness::new(board);

    let viewport = TimelineViewport::new(d("2025-06-01"), d("2025-06-30"), 60.0);
    let timing = SchedulerSettings::default().bar_timing();
    let mut bar = BarInteraction::new(task_id, DateInterval::single(d("2025-06-10")));
    let x = viewport.date_to_x(d("2025-06-10")) + 30.0;
    bar.handle(BarEvent::Press { target: BarTarget::Body, x, time: 1.0 }, &viewport, timing);
    let effect = bar
        .handle(BarEvent::Release { x, time: 1.1 }, &viewport, timing)
        .expect("click");
    assert_eq!(apply_bar_effect(&mut bar, effect, &mut harness), None);
    assert_eq!(harness.details, vec![DetailTarget::Task(task_id)]);
    assert_eq!(harness.commits, 0);
}
