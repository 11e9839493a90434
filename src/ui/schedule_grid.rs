use std::collections::HashMap;

use chrono::NaiveDate;
use egui::{Color32, Id, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};
use uuid::Uuid;

use crate::ui::theme;
use timeblock_board::config::SchedulerSettings;
use timeblock_board::engine::collab::SiblingIntervals;
use timeblock_board::engine::layout::{block_rect, block_target_at, SlotRect};
use timeblock_board::engine::{
    BlockContext, BlockEffect, BlockEvent, BlockGesture, BlockInteraction, BlockTarget,
    SelectionEffect, SlotGrid, SlotSelector,
};
use timeblock_board::model::Board;

/// What happened in the grid this frame.
#[derive(Debug, Default)]
pub struct GridInteraction {
    pub block_effects: Vec<BlockEffect>,
    pub selection: Option<SelectionEffect>,
}

/// Mutable engine state the grid drives.
pub struct GridState<'a> {
    pub selector: &'a mut SlotSelector,
    pub blocks: &'a mut HashMap<Uuid, BlockInteraction>,
}

fn last_cell_id() -> Id {
    Id::new("slot-grid-last-cell")
}

/// Render the day's slot grid (one column per resource) and run its gestures.
pub fn show_schedule_grid(
    board: &Board,
    day: NaiveDate,
    grid: &SlotGrid,
    settings: &SchedulerSettings,
    state: GridState<'_>,
    ui: &mut Ui,
) -> GridInteraction {
    let GridState { selector, blocks } = state;
    let mut interaction = GridInteraction::default();

    // Keep one interaction per block of the day, synced to its committed interval.
    blocks.retain(|id, _| board.block(*id).is_some_and(|b| b.day == day));
    for block in board.blocks.iter().filter(|b| b.day == day) {
        blocks
            .entry(block.id)
            .or_insert_with(|| BlockInteraction::new(block.id, block.interval))
            .sync(block.interval);
    }

    let columns = board.resources.len().max(1);
    let width = theme::TIME_GUTTER + columns as f32 * (theme::COLUMN_WIDTH + theme::COLUMN_GAP);
    let height = theme::HEADER_HEIGHT + grid.total_height() + 16.0;

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .drag_to_scroll(false)
        .show(ui, |ui| {
            let (response, painter) =
                ui.allocate_painter(Vec2::new(width, height), Sense::click_and_drag());
            let origin = response.rect.min;
            let grid_top = origin.y + theme::HEADER_HEIGHT;
            let column_x = |index: usize| {
                origin.x + theme::TIME_GUTTER + index as f32 * (theme::COLUMN_WIDTH + theme::COLUMN_GAP)
            };

            painter.rect_filled(response.rect, 0.0, theme::BG_DARK);
            draw_time_gutter(&painter, origin, grid, width);

            for (col, resource) in board.resources.iter().enumerate() {
                let x = column_x(col);
                draw_column(&painter, x, origin.y, grid, &resource.name, resource.color);

                if let Some(range) = selector.selected_range(resource.id) {
                    let top = grid_top + *range.start() as f32 * grid.slot_height;
                    let bottom = grid_top + (*range.end() + 1) as f32 * grid.slot_height;
                    painter.rect_filled(
                        Rect::from_min_max(Pos2::new(x, top), Pos2::new(x + theme::COLUMN_WIDTH, bottom)),
                        Rounding::same(2.0),
                        theme::SLOT_SELECTED,
                    );
                }
            }

            // ── Pointer input ──────────────────────────────────────────
            let (pointer, pressed, released, time) = ui.input(|i| {
                (
                    i.pointer.interact_pos(),
                    i.pointer.primary_pressed(),
                    i.pointer.primary_released(),
                    i.time,
                )
            });
            let column_at = |pos: Pos2| {
                board.resources.iter().enumerate().find_map(|(col, r)| {
                    let x = column_x(col);
                    (pos.x >= x && pos.x < x + theme::COLUMN_WIDTH).then_some(r.id)
                })
            };
            let timing = settings.block_timing();

            let active = blocks.values().find(|b| b.is_active()).map(|b| b.block_id());
            if let Some(block_id) = active {
                if let (Some(block), Some(record)) = (blocks.get_mut(&block_id), board.block(block_id)) {
                    let siblings =
                        board.sibling_intervals(record.resource_id, day, Some(block_id));
                    let ctx = BlockContext {
                        grid,
                        siblings: &siblings,
                        timing,
                    };
                    let col = board
                        .resources
                        .iter()
                        .position(|r| r.id == record.resource_id)
                        .unwrap_or(0);
                    let bounds = screen_rect(&block_rect(&block.committed(), grid), column_x(col), grid_top);
                    let event = match pointer {
                        Some(pos) if released => Some(BlockEvent::Release { y: pos.y - grid_top, time }),
                        Some(pos) if !bounds.contains(pos) => {
                            block.handle(BlockEvent::Leave { time }, &ctx);
                            Some(BlockEvent::Move { y: pos.y - grid_top, time })
                        }
                        Some(pos) => Some(BlockEvent::Move { y: pos.y - grid_top, time }),
                        None if released => Some(BlockEvent::Leave { time }),
                        None => Some(BlockEvent::Tick { time }),
                    };
                    if let Some(event) = event {
                        if let Some(effect) = block.handle(event, &ctx) {
                            interaction.block_effects.push(effect);
                        }
                    }
                    // A release that found no pointer still ends the gesture.
                    if released && block.is_active() {
                        block.cancel();
                    }
                    if block.is_active() {
                        ui.ctx().request_repaint();
                    }
                }
            } else if selector.is_selecting() {
                if let Some(pos) = pointer {
                    if let (Some(resource_id), Some(slot)) =
                        (column_at(pos), grid.slot_at_y(pos.y - grid_top))
                    {
                        let last = ui.ctx().data(|d| d.get_temp::<(Uuid, usize)>(last_cell_id()));
                        if last != Some((resource_id, slot)) {
                            selector.enter(resource_id, slot);
                            ui.ctx()
                                .data_mut(|d| d.insert_temp(last_cell_id(), (resource_id, slot)));
                        }
                    }
                }
                if released {
                    ui.ctx().data_mut(|d| d.remove::<(Uuid, usize)>(last_cell_id()));
                    let siblings = selector
                        .active_resource()
                        .map(|r| board.sibling_intervals(r, day, None))
                        .unwrap_or_default();
                    interaction.selection =
                        selector.release(grid, &siblings, settings.collision_policy);
                }
            } else if pressed {
                if let Some(pos) = pointer.filter(|p| response.rect.contains(*p)) {
                    if let Some(resource_id) = column_at(pos) {
                        let y = pos.y - grid_top;
                        let hit = board.column(resource_id, day).into_iter().find_map(|b| {
                            let rect = block_rect(&b.interval, grid);
                            block_target_at(&rect, y, settings.handle_size).map(|t| (b.id, t))
                        });
                        match hit {
                            Some((block_id, target)) => {
                                if let (Some(block), Some(record)) =
                                    (blocks.get_mut(&block_id), board.block(block_id))
                                {
                                    let siblings =
                                        board.sibling_intervals(record.resource_id, day, Some(block_id));
                                    let ctx = BlockContext {
                                        grid,
                                        siblings: &siblings,
                                        timing,
                                    };
                                    block.handle(BlockEvent::Press { target, y, time }, &ctx);
                                    ui.ctx().request_repaint();
                                }
                            }
                            None => {
                                if let Some(slot) = grid.slot_at_y(y) {
                                    selector.press(resource_id, slot);
                                    ui.ctx()
                                        .data_mut(|d| d.insert_temp(last_cell_id(), (resource_id, slot)));
                                }
                            }
                        }
                    }
                }
            }

            // ── Blocks ─────────────────────────────────────────────────
            for (col, resource) in board.resources.iter().enumerate() {
                let x = column_x(col);
                for record in board.column(resource.id, day) {
                    let Some(block) = blocks.get(&record.id) else {
                        continue;
                    };
                    let title = board
                        .item(record.item_id)
                        .map(|i| i.title.as_str())
                        .unwrap_or("(missing item)");
                    let hovered = pointer.is_some_and(|p| {
                        screen_rect(&block.rect(grid), x, grid_top).contains(p)
                    });
                    draw_block(&painter, block, grid, x, grid_top, title, resource.color, hovered);

                    if hovered && !block.is_active() {
                        if let Some(p) = pointer {
                            let cursor = match block_target_at(&block.rect(grid), p.y - grid_top, settings.handle_size) {
                                Some(BlockTarget::Body) => egui::CursorIcon::PointingHand,
                                Some(_) => egui::CursorIcon::ResizeVertical,
                                None => egui::CursorIcon::Default,
                            };
                            ui.ctx().set_cursor_icon(cursor);
                        }
                    }
                }
            }

            if let Some(block) = blocks.values().find(|b| b.is_active()) {
                let cursor = match block.gesture() {
                    BlockGesture::Resizing { .. } => egui::CursorIcon::ResizeVertical,
                    _ if block.is_blocked() => egui::CursorIcon::NotAllowed,
                    BlockGesture::Dragging { .. } => egui::CursorIcon::Grabbing,
                    _ => egui::CursorIcon::Default,
                };
                ui.ctx().set_cursor_icon(cursor);
            }

            if board.resources.is_empty() {
                painter.text(
                    Pos2::new(origin.x + theme::TIME_GUTTER + 12.0, grid_top + 20.0),
                    egui::Align2::LEFT_CENTER,
                    "No people on this board yet",
                    theme::font_header(),
                    theme::TEXT_DIM,
                );
            }
        });

    interaction
}

fn screen_rect(rect: &SlotRect, column_x: f32, grid_top: f32) -> Rect {
    Rect::from_min_size(
        Pos2::new(column_x, grid_top + rect.top),
        Vec2::new(theme::COLUMN_WIDTH, rect.height),
    )
}

fn draw_time_gutter(painter: &egui::Painter, origin: Pos2, grid: &SlotGrid, width: f32) {
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(width, theme::HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );
    let grid_top = origin.y + theme::HEADER_HEIGHT;
    for slot in 0..=grid.slot_count() {
        let y = grid_top + slot as f32 * grid.slot_height;
        let time = grid.slot_start(slot);
        let on_hour = time.minutes() % 60 == 0;
        painter.line_segment(
            [Pos2::new(origin.x + theme::TIME_GUTTER - 6.0, y), Pos2::new(origin.x + width, y)],
            Stroke::new(if on_hour { 1.0 } else { 0.5 }, if on_hour { theme::HOUR_LINE } else { theme::GRID_LINE }),
        );
        if on_hour {
            painter.text(
                Pos2::new(origin.x + theme::TIME_GUTTER - 10.0, y),
                egui::Align2::RIGHT_CENTER,
                time.to_string(),
                theme::font_sub(),
                theme::TEXT_SECONDARY,
            );
        }
    }
}

fn draw_column(
    painter: &egui::Painter,
    x: f32,
    top: f32,
    grid: &SlotGrid,
    name: &str,
    color: Color32,
) {
    let body = Rect::from_min_size(
        Pos2::new(x, top + theme::HEADER_HEIGHT),
        Vec2::new(theme::COLUMN_WIDTH, grid.total_height()),
    );
    painter.rect_filled(body, 0.0, theme::faded(theme::BG_PANEL, 200));
    painter.circle_filled(Pos2::new(x + 10.0, top + theme::HEADER_HEIGHT / 2.0), 4.0, color);
    painter.text(
        Pos2::new(x + 20.0, top + theme::HEADER_HEIGHT / 2.0),
        egui::Align2::LEFT_CENTER,
        name,
        theme::font_header(),
        theme::TEXT_PRIMARY,
    );
}

#[allow(clippy::too_many_arguments)]
fn draw_block(
    painter: &egui::Painter,
    block: &BlockInteraction,
    grid: &SlotGrid,
    column_x: f32,
    grid_top: f32,
    title: &str,
    color: Color32,
    hovered: bool,
) {
    let rect = screen_rect(&block.rect(grid), column_x, grid_top).shrink2(Vec2::new(3.0, 1.0));
    let rounding = Rounding::same(theme::BLOCK_ROUNDING);
    let fill = if block.is_blocked() { theme::BLOCKED } else { color };

    // Ghost of the committed position while a gesture is live.
    if block.is_active() && block.live_interval() != block.committed() {
        let ghost = screen_rect(&block_rect(&block.committed(), grid), column_x, grid_top)
            .shrink2(Vec2::new(3.0, 1.0));
        painter.rect_stroke(ghost, rounding, Stroke::new(1.0, theme::faded(color, 140)));
    }

    painter.rect_filled(rect.translate(Vec2::new(1.0, 2.0)), rounding, Color32::from_black_alpha(35));
    painter.rect_filled(rect, rounding, fill);
    if block.is_active() || hovered {
        painter.rect_stroke(rect.expand(1.0), rounding, Stroke::new(1.5, theme::BORDER_ACCENT));
        let handle_w = (rect.width() * 0.3).min(40.0);
        for y in [rect.top() + 2.0, rect.bottom() - 4.0] {
            painter.rect_filled(
                Rect::from_min_size(Pos2::new(rect.center().x - handle_w / 2.0, y), Vec2::new(handle_w, 2.0)),
                Rounding::same(1.0),
                theme::HANDLE_COLOR,
            );
        }
    }

    let clipped = painter.with_clip_rect(rect);
    clipped.text(
        Pos2::new(rect.left() + 6.0, rect.top() + 4.0),
        egui::Align2::LEFT_TOP,
        title,
        theme::font_bar(),
        theme::TEXT_ON_BAR,
    );
    if rect.height() > 30.0 {
        clipped.text(
            Pos2::new(rect.left() + 6.0, rect.top() + 18.0),
            egui::Align2::LEFT_TOP,
            block.live_interval().to_string(),
            theme::font_small(),
            Color32::from_white_alpha(200),
        );
    }
}
