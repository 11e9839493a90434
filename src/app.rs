use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{Duration, NaiveDate};
use tracing::{info, warn};
use uuid::Uuid;

use crate::ui;
use timeblock_board::config::SchedulerSettings;
use timeblock_board::engine::collab::{
    apply_bar_effect, apply_block_effect, apply_selection_effect, BarCommitter, BlockCommitter,
    CreationFlow, DetailView,
};
use timeblock_board::engine::{
    BarEffect, BarInteraction, BlockEffect, BlockInteraction, CollisionPolicy, CommitOutcome,
    DetailTarget, SelectionEffect, SlotGrid, SlotProposal, SlotSelector,
};
use timeblock_board::error::ConfigError;
use timeblock_board::model::{
    Board, ClockTime, DateInterval, Feature, Task, TimeInterval, TimelineViewport,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Schedule,
    Timeline,
}

/// A slot selection waiting for the user to pick what to book.
#[derive(Debug, Clone)]
pub struct CreationDraft {
    pub day: NaiveDate,
    pub proposal: SlotProposal,
    pub item_id: Option<Uuid>,
    pub title: String,
}

/// Main application state.
pub struct SchedulerApp {
    pub board: Board,
    pub board_path: PathBuf,
    pub settings: SchedulerSettings,
    pub settings_path: PathBuf,
    pub grid: SlotGrid,
    pub viewport: TimelineViewport,
    pub view: View,
    pub day: NaiveDate,

    // Gesture state
    pub selector: SlotSelector,
    pub blocks: HashMap<Uuid, BlockInteraction>,
    pub bars: HashMap<Uuid, BarInteraction>,

    // Dialog state
    pub creation: Option<CreationDraft>,
    pub detail: Option<DetailTarget>,
    pub show_about: bool,

    pub status_message: String,
}

/// Routes engine effects to the board and the app's dialogs.
struct Dispatch<'a> {
    board: &'a mut Board,
    creation: &'a mut Option<CreationDraft>,
    detail: &'a mut Option<DetailTarget>,
}

impl BlockCommitter for Dispatch<'_> {
    fn commit_block(&mut self, block_id: Uuid, start: ClockTime, end: ClockTime) -> CommitOutcome {
        self.board.commit_block(block_id, start, end)
    }
}

impl BarCommitter for Dispatch<'_> {
    fn commit_bar(&mut self, task_id: Uuid, start: NaiveDate, end: NaiveDate) -> CommitOutcome {
        self.board.commit_bar(task_id, start, end)
    }
}

impl DetailView for Dispatch<'_> {
    fn open_detail(&mut self, target: DetailTarget) {
        *self.detail = Some(target);
    }
}

impl CreationFlow for Dispatch<'_> {
    fn open_creation(&mut self, day: NaiveDate, proposal: SlotProposal) {
        *self.creation = Some(CreationDraft {
            day,
            proposal,
            item_id: None,
            title: String::new(),
        });
    }
}

impl SchedulerApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Result<Self, ConfigError> {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let settings_path = SchedulerSettings::default_path();
        let settings = SchedulerSettings::load_or_default(&settings_path);
        let grid = settings.slot_grid()?;

        let board_path = timeblock_board::io::default_board_path();
        let (board, status_message) = if board_path.exists() {
            match timeblock_board::io::load_board(&board_path) {
                Ok(board) => (board, "Board loaded".to_string()),
                Err(e) => {
                    warn!(path = %board_path.display(), error = %e, "could not load board");
                    (Self::sample_board(), format!("Error loading board: {}", e))
                }
            }
        } else {
            (Self::sample_board(), "Ready".to_string())
        };

        let today = chrono::Local::now().date_naive();
        let mut viewport = TimelineViewport::new(
            today - Duration::days(7),
            today + Duration::days(30),
            settings.day_width,
        );
        viewport.bar_margin = settings.bar_margin;

        let mut app = Self {
            board,
            board_path,
            settings,
            settings_path,
            grid,
            viewport,
            view: View::Schedule,
            day: today,
            selector: SlotSelector::new(),
            blocks: HashMap::new(),
            bars: HashMap::new(),
            creation: None,
            detail: None,
            show_about: false,
            status_message,
        };
        app.fit_timeline();
        Ok(app)
    }

    /// Generate a sample board for demonstration.
    pub fn sample_board() -> Board {
        let today = chrono::Local::now().date_naive();
        let mut board = Board::new("Team Board");

        let ids: Vec<Uuid> = ["Alice", "Bob", "Chen"]
            .iter()
            .enumerate()
            .map(|(i, name)| board.add_resource(*name, ui::theme::palette_color(i)))
            .collect();
        let items: Vec<Uuid> = ["Code review", "Sprint planning", "Customer call"]
            .iter()
            .map(|title| board.add_item(*title))
            .collect();

        let bookings = [
            (0, "09:30", "11:00", Some(0)),
            (0, "13:00", "14:00", Some(2)),
            (1, "10:00", "11:30", Some(1)),
            (2, "10:00", "11:30", Some(1)),
            (2, "15:00", "16:30", None),
        ];
        for (person, start, end, item) in bookings {
            if let Ok(interval) = TimeInterval::parse(start, end) {
                let item_id = item.map(|i: usize| items[i]);
                board.create_block(ids[person], today, interval, item_id, "Focus time");
            }
        }

        // ── Features and their tasks ────────────────────────────────
        let plan = [
            ("Onboarding flow", [("Wireframes", -3, 2), ("API endpoints", 1, 9), ("QA pass", 8, 12)]),
            ("Billing", [("Invoice model", 4, 10), ("Payment provider", 9, 20), ("Rollout", 19, 24)]),
        ];
        for (i, (feature_name, tasks)) in plan.into_iter().enumerate() {
            let feature = Feature::new(feature_name, ui::theme::palette_color(i + 3));
            for (j, (name, from, to)) in tasks.into_iter().enumerate() {
                let dates = DateInterval::new(today + Duration::days(from), today + Duration::days(to));
                if let Ok(dates) = dates {
                    let mut task = Task::new(feature.id, name, dates);
                    task.assignee = ids.get(j).copied();
                    board.tasks.push(task);
                }
            }
            board.features.push(feature);
        }
        board
    }

    // --- File operations ---

    pub fn save_board(&mut self) {
        match timeblock_board::io::save_board(&self.board, &self.board_path) {
            Ok(()) => self.status_message = "Board saved".to_string(),
            Err(e) => self.status_message = format!("Error saving: {}", e),
        }
    }

    /// Autosave after a change; only reports failures.
    fn persist(&mut self) {
        if let Err(e) = timeblock_board::io::save_board(&self.board, &self.board_path) {
            warn!(error = %e, "autosave failed");
            self.status_message = format!("Error saving: {}", e);
        }
    }

    pub fn reload_board(&mut self) {
        match timeblock_board::io::load_board(&self.board_path) {
            Ok(board) => {
                self.replace_board(board);
                self.status_message = "Board reloaded".to_string();
            }
            Err(e) => self.status_message = format!("Error loading: {}", e),
        }
    }

    pub fn load_sample(&mut self) {
        self.replace_board(Self::sample_board());
        self.status_message = "Sample board loaded (not saved yet)".to_string();
    }

    fn replace_board(&mut self, board: Board) {
        self.board = board;
        self.blocks.clear();
        self.bars.clear();
        self.selector.cancel();
        self.creation = None;
        self.detail = None;
        self.fit_timeline();
    }

    pub fn fit_timeline(&mut self) {
        if let Some(span) = self.board.plan_span() {
            self.viewport.fit(span, 7);
        }
    }

    // --- Settings ---

    pub fn set_collision_policy(&mut self, policy: CollisionPolicy) {
        if self.settings.collision_policy == policy {
            return;
        }
        self.settings.collision_policy = policy;
        match self.settings.save(&self.settings_path) {
            Ok(()) => {
                info!(?policy, "collision policy changed");
                self.status_message = format!("Collision checks: {}", policy_label(policy));
            }
            Err(e) => self.status_message = format!("Error saving settings: {}", e),
        }
    }

    // --- Navigation ---

    pub fn set_day(&mut self, day: NaiveDate) {
        if day != self.day {
            self.day = day;
            self.selector.cancel();
            self.blocks.clear();
        }
    }

    // --- Board operations ---

    pub fn create_from_draft(&mut self) {
        let Some(draft) = self.creation.take() else {
            return;
        };
        let id = self.board.create_block(
            draft.proposal.resource_id,
            draft.day,
            draft.proposal.interval,
            draft.item_id,
            &draft.title,
        );
        info!(block_id = %id, interval = %draft.proposal.interval, "block booked");
        self.status_message = format!("Booked {}", draft.proposal.interval);
        self.persist();
    }

    pub fn delete_block(&mut self, id: Uuid) {
        if self.board.delete_block(id) {
            self.blocks.remove(&id);
            self.status_message = "Block deleted".to_string();
            self.persist();
        }
        self.detail = None;
    }

    fn apply_block_effects(&mut self, effects: Vec<BlockEffect>) {
        for effect in effects {
            let block_id = match effect {
                BlockEffect::Commit { block_id, .. }
                | BlockEffect::Vetoed { block_id, .. }
                | BlockEffect::OpenDetail { block_id } => block_id,
            };
            if let BlockEffect::Vetoed { attempted, .. } = effect {
                self.status_message = format!("{} overlaps another block; move cancelled", attempted);
            }
            let Some(block) = self.blocks.get_mut(&block_id) else {
                continue;
            };
            let mut dispatch = Dispatch {
                board: &mut self.board,
                creation: &mut self.creation,
                detail: &mut self.detail,
            };
            match apply_block_effect(block, effect, &mut dispatch) {
                Some(CommitOutcome::Committed) => {
                    self.status_message = format!("Moved to {}", block.committed());
                    self.persist();
                }
                Some(CommitOutcome::Failed(reason)) => {
                    self.status_message = format!("Could not save block: {}", reason);
                }
                None => {}
            }
        }
    }

    fn apply_bar_effects(&mut self, effects: Vec<BarEffect>) {
        for effect in effects {
            let task_id = match effect {
                BarEffect::Commit { task_id, .. } | BarEffect::OpenDetail { task_id } => task_id,
            };
            let Some(bar) = self.bars.get_mut(&task_id) else {
                continue;
            };
            let mut dispatch = Dispatch {
                board: &mut self.board,
                creation: &mut self.creation,
                detail: &mut self.detail,
            };
            match apply_bar_effect(bar, effect, &mut dispatch) {
                Some(CommitOutcome::Committed) => {
                    let dates = bar.committed();
                    self.status_message = format!(
                        "Updated ({} → {})",
                        dates.start().format("%Y-%m-%d"),
                        dates.end().format("%Y-%m-%d")
                    );
                    self.persist();
                }
                Some(CommitOutcome::Failed(reason)) => {
                    self.status_message = format!("Could not save task: {}", reason);
                }
                None => {}
            }
        }
    }

    fn apply_selection(&mut self, effect: SelectionEffect) {
        let mut dispatch = Dispatch {
            board: &mut self.board,
            creation: &mut self.creation,
            detail: &mut self.detail,
        };
        if !apply_selection_effect(self.day, effect, &mut dispatch) {
            if let SelectionEffect::Rejected(proposal) = effect {
                self.status_message = format!("{} overlaps an existing block", proposal.interval);
            }
        }
    }

    fn cancel_gestures(&mut self) {
        self.selector.cancel();
        self.blocks.values_mut().for_each(BlockInteraction::cancel);
        self.bars.values_mut().for_each(BarInteraction::cancel);
    }
}

pub fn policy_label(policy: CollisionPolicy) -> &'static str {
    match policy {
        CollisionPolicy::MoveOnly => "moves only",
        CollisionPolicy::Uniform => "moves, resizes and new blocks",
    }
}

impl eframe::App for SchedulerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply_theme(ctx);

        // Handle keyboard shortcuts outside closures to avoid borrow issues
        let should_save = ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::S));
        let should_cancel = self.creation.is_none()
            && self.detail.is_none()
            && ctx.input(|i| i.key_pressed(egui::Key::Escape));
        if should_save {
            self.save_board();
        }
        if should_cancel {
            self.cancel_gestures();
        }

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Bottom panel: status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_STATUS)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .font(ui::theme::font_bar())
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let summary = match self.view {
                            View::Schedule => format!(
                                "Blocks today: {}",
                                self.board.blocks.iter().filter(|b| b.day == self.day).count()
                            ),
                            View::Timeline => format!(
                                "Tasks: {}  ·  {:.0} px/day",
                                self.board.tasks.len(),
                                self.viewport.day_width
                            ),
                        };
                        ui.label(egui::RichText::new(summary).size(10.5).color(ui::theme::TEXT_DIM));
                    });
                });
            });

        // Central panel: slot grid or timeline
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        let mut grid_interaction = None;
        let mut chart_interaction = None;
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| match self.view {
            View::Schedule => {
                grid_interaction = Some(ui::schedule_grid::show_schedule_grid(
                    &self.board,
                    self.day,
                    &self.grid,
                    &self.settings,
                    ui::schedule_grid::GridState {
                        selector: &mut self.selector,
                        blocks: &mut self.blocks,
                    },
                    ui,
                ));
            }
            View::Timeline => {
                chart_interaction = Some(ui::gantt_chart::show_gantt_chart(
                    &self.board,
                    &mut self.viewport,
                    &mut self.bars,
                    &self.settings,
                    ui,
                ));
            }
        });

        if let Some(interaction) = grid_interaction {
            self.apply_block_effects(interaction.block_effects);
            if let Some(effect) = interaction.selection {
                self.apply_selection(effect);
            }
        }
        if let Some(interaction) = chart_interaction {
            self.apply_bar_effects(interaction.bar_effects);
        }

        // Dialogs
        if self.creation.is_some() {
            ui::dialogs::show_creation_dialog(self, ctx);
        }
        if self.detail.is_some() {
            ui::dialogs::show_detail_dialog(self, ctx);
        }
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
    }
}
