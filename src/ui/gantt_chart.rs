use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use egui::{Color32, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};
use uuid::Uuid;

use crate::ui::theme;
use timeblock_board::config::SchedulerSettings;
use timeblock_board::engine::layout::{bar_span, bar_target_at, BarSpan};
use timeblock_board::engine::{BarEffect, BarEvent, BarGesture, BarInteraction, BarTarget};
use timeblock_board::model::{Board, DateInterval, Feature, Task, TimelineViewport};

const ROW_HEIGHT: f32 = theme::ROW_HEIGHT;
const ROW_PADDING: f32 = theme::ROW_GAP;
const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;

/// Result details from interactions in the Gantt chart.
#[derive(Debug, Default)]
pub struct ChartInteraction {
    pub bar_effects: Vec<BarEffect>,
}

enum Row<'a> {
    Feature(&'a Feature, Option<DateInterval>),
    Task(&'a Task, Color32),
}

fn rows(board: &Board) -> Vec<Row<'_>> {
    let mut rows = Vec::new();
    for feature in &board.features {
        rows.push(Row::Feature(feature, board.feature_span(feature.id)));
        for task in board.tasks_of(feature.id) {
            rows.push(Row::Task(task, feature.color));
        }
    }
    rows
}

/// Render the Gantt chart and run the bar gestures.
pub fn show_gantt_chart(
    board: &Board,
    viewport: &mut TimelineViewport,
    bars: &mut HashMap<Uuid, BarInteraction>,
    settings: &SchedulerSettings,
    ui: &mut Ui,
) -> ChartInteraction {
    let mut interaction = ChartInteraction::default();

    bars.retain(|id, _| board.task(*id).is_some());
    for task in &board.tasks {
        bars.entry(task.id)
            .or_insert_with(|| BarInteraction::new(task.id, task.dates))
            .sync(task.dates);
    }

    // Handle zoom with scroll wheel
    let scroll_delta = ui.input(|i| i.smooth_scroll_delta);
    if ui.rect_contains_pointer(ui.max_rect()) && ui.input(|i| i.modifiers.ctrl) {
        if scroll_delta.y > 0.0 {
            viewport.zoom_in();
        } else if scroll_delta.y < 0.0 {
            viewport.zoom_out();
        }
    }

    let viewport: &TimelineViewport = viewport;
    let rows = rows(board);
    let available = ui.available_size();
    let chart_width = (theme::NAME_GUTTER + viewport.total_width()).max(available.x);
    let chart_height = HEADER_HEIGHT + rows.len() as f32 * (ROW_HEIGHT + ROW_PADDING) + 40.0;
    let timing = settings.bar_timing();

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .drag_to_scroll(false)
        .show(ui, |ui| {
            let (response, painter) = ui.allocate_painter(
                Vec2::new(chart_width, chart_height.max(available.y)),
                Sense::click_and_drag(),
            );
            let origin = response.rect.min;
            let timeline_x = origin.x + theme::NAME_GUTTER;
            let row_y = |i: usize| origin.y + HEADER_HEIGHT + i as f32 * (ROW_HEIGHT + ROW_PADDING);

            painter.rect_filled(response.rect, 0.0, theme::BG_DARK);
            draw_timeline_header(&painter, Pos2::new(timeline_x, origin.y), viewport, chart_width);

            for (i, row) in rows.iter().enumerate() {
                let y = row_y(i);
                let row_bg = if i % 2 == 0 { theme::BG_PANEL } else { theme::BG_DARK };
                painter.rect_filled(
                    Rect::from_min_size(Pos2::new(origin.x, y), Vec2::new(chart_width, ROW_HEIGHT + ROW_PADDING)),
                    0.0,
                    row_bg,
                );
                let (label, font, color) = match row {
                    Row::Feature(f, _) => (f.name.as_str(), theme::font_header(), theme::TEXT_PRIMARY),
                    Row::Task(t, _) => (t.name.as_str(), theme::font_bar(), theme::TEXT_SECONDARY),
                };
                let indent = if matches!(row, Row::Task(..)) { 22.0 } else { 8.0 };
                painter.with_clip_rect(Rect::from_min_size(
                    Pos2::new(origin.x, y),
                    Vec2::new(theme::NAME_GUTTER - 6.0, ROW_HEIGHT),
                ))
                .text(
                    Pos2::new(origin.x + indent, y + ROW_HEIGHT / 2.0),
                    egui::Align2::LEFT_CENTER,
                    label,
                    font,
                    color,
                );
            }
            painter.line_segment(
                [Pos2::new(timeline_x, origin.y), Pos2::new(timeline_x, origin.y + chart_height)],
                Stroke::new(1.0, theme::BORDER_SUBTLE),
            );

            draw_today_line(&painter, Pos2::new(timeline_x, origin.y), viewport, chart_height);

            // ── Pointer input ──────────────────────────────────────────
            let (pointer, pressed, released, time) = ui.input(|i| {
                (
                    i.pointer.interact_pos(),
                    i.pointer.primary_pressed(),
                    i.pointer.primary_released(),
                    i.time,
                )
            });
            let bar_rect = |row: usize, span: &BarSpan| {
                Rect::from_min_size(
                    Pos2::new(timeline_x + span.left, row_y(row) + ROW_PADDING + theme::BAR_INSET),
                    Vec2::new(span.width.max(6.0), ROW_HEIGHT - theme::BAR_INSET * 2.0),
                )
            };
            let task_row = |task_id: Uuid| {
                rows.iter()
                    .position(|r| matches!(r, Row::Task(t, _) if t.id == task_id))
            };

            let active = bars.values().find(|b| b.is_active()).map(|b| b.task_id());
            if let Some(task_id) = active {
                if let Some(bar) = bars.get_mut(&task_id) {
                    let bounds = task_row(task_id)
                        .zip(bar_span(&bar.committed(), viewport))
                        .map(|(row, span)| bar_rect(row, &span));
                    let event = match pointer {
                        Some(pos) if released => BarEvent::Release { x: pos.x - timeline_x, time },
                        Some(pos) => {
                            if !bounds.is_some_and(|r| r.contains(pos)) {
                                bar.handle(BarEvent::Leave { time }, viewport, timing);
                            }
                            BarEvent::Move { x: pos.x - timeline_x, time }
                        }
                        None if released => BarEvent::Leave { time },
                        None => BarEvent::Tick { time },
                    };
                    if let Some(effect) = bar.handle(event, viewport, timing) {
                        interaction.bar_effects.push(effect);
                    }
                    if released && bar.is_active() {
                        bar.cancel();
                    }
                    if bar.is_active() {
                        ui.ctx().request_repaint();
                    }
                }
            } else if pressed {
                if let Some(pos) = pointer.filter(|p| response.rect.contains(*p) && p.x >= timeline_x) {
                    let hit = rows.iter().enumerate().find_map(|(i, row)| match row {
                        Row::Task(task, _) => {
                            let bar = bars.get(&task.id)?;
                            let span = bar.span(viewport)?;
                            if !bar_rect(i, &span).contains(pos) {
                                return None;
                            }
                            bar_target_at(&span, pos.x - timeline_x, settings.handle_size)
                                .map(|target| (task.id, target))
                        }
                        Row::Feature(..) => None,
                    });
                    if let Some((task_id, target)) = hit {
                        if let Some(bar) = bars.get_mut(&task_id) {
                            bar.handle(
                                BarEvent::Press { target, x: pos.x - timeline_x, time },
                                viewport,
                                timing,
                            );
                            ui.ctx().request_repaint();
                        }
                    }
                }
            }

            // ── Bars ───────────────────────────────────────────────────
            let bar_painter = painter.with_clip_rect(Rect::from_min_max(
                Pos2::new(timeline_x, origin.y + HEADER_HEIGHT),
                response.rect.max,
            ));
            for (i, row) in rows.iter().enumerate() {
                match row {
                    Row::Feature(feature, Some(span)) => {
                        if let Some(s) = bar_span(span, viewport) {
                            draw_summary_bar(&bar_painter, bar_rect(i, &s), feature.color);
                        }
                    }
                    Row::Feature(_, None) => {}
                    Row::Task(task, color) => {
                        let Some(bar) = bars.get(&task.id) else {
                            continue;
                        };
                        let Some(span) = bar.span(viewport) else {
                            continue;
                        };
                        let rect = bar_rect(i, &span);
                        let hovered = pointer.is_some_and(|p| rect.contains(p));
                        draw_task_bar(&bar_painter, rect, &task.name, *color, bar.is_active() || hovered);

                        if hovered && !bar.is_active() {
                            if let Some(p) = pointer {
                                let cursor = match bar_target_at(&span, p.x - timeline_x, settings.handle_size) {
                                    Some(BarTarget::Body) => egui::CursorIcon::PointingHand,
                                    Some(_) => egui::CursorIcon::ResizeHorizontal,
                                    None => egui::CursorIcon::Default,
                                };
                                ui.ctx().set_cursor_icon(cursor);
                            }
                        }

                        if bar.is_active() {
                            let dates = bar.live_dates();
                            egui::show_tooltip_at_pointer(
                                ui.ctx(),
                                ui.layer_id(),
                                egui::Id::new(("task-drag-tip", task.id)),
                                |ui| {
                                    ui.strong(&task.name);
                                    ui.label(format!(
                                        "{} → {}",
                                        dates.start().format("%d/%m/%Y"),
                                        dates.end().format("%d/%m/%Y"),
                                    ));
                                },
                            );
                        }
                    }
                }
            }

            if let Some(bar) = bars.values().find(|b| b.is_active()) {
                let cursor = match bar.gesture() {
                    BarGesture::Resizing { .. } => egui::CursorIcon::ResizeHorizontal,
                    BarGesture::Moving { .. } => egui::CursorIcon::Grabbing,
                    _ => egui::CursorIcon::Default,
                };
                ui.ctx().set_cursor_icon(cursor);
            }
        });

    interaction
}

fn draw_timeline_header(
    painter: &egui::Painter,
    origin: Pos2,
    viewport: &TimelineViewport,
    width: f32,
) {
    painter.rect_filled(
        Rect::from_min_size(Pos2::new(origin.x - theme::NAME_GUTTER, origin.y), Vec2::new(width, HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );
    painter.line_segment(
        [
            Pos2::new(origin.x - theme::NAME_GUTTER, origin.y + HEADER_HEIGHT),
            Pos2::new(origin.x - theme::NAME_GUTTER + width, origin.y + HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    let mut date = viewport.start;
    while date <= viewport.end {
        let x = origin.x + viewport.date_to_x(date);

        painter.line_segment(
            [Pos2::new(x, origin.y + HEADER_HEIGHT), Pos2::new(x, origin.y + 2000.0)],
            Stroke::new(0.5, theme::GRID_LINE),
        );

        if viewport.day_width >= 20.0 {
            let is_weekend = date.weekday().num_days_from_monday() >= 5;
            painter.text(
                Pos2::new(x + 3.0, origin.y + 28.0),
                egui::Align2::LEFT_CENTER,
                date.format("%d").to_string(),
                theme::font_sub(),
                if is_weekend { theme::TEXT_DIM } else { theme::TEXT_SECONDARY },
            );
        }

        if date.day() == 1 || date == viewport.start {
            painter.text(
                Pos2::new(x + 3.0, origin.y + 12.0),
                egui::Align2::LEFT_CENTER,
                date.format("%b %Y").to_string(),
                theme::font_header(),
                theme::TEXT_PRIMARY,
            );
        }

        date += chrono::Duration::days(1);
    }
}

fn draw_today_line(painter: &egui::Painter, origin: Pos2, viewport: &TimelineViewport, height: f32) {
    let today: NaiveDate = chrono::Local::now().date_naive();
    if !viewport.range().contains(today) {
        return;
    }
    let x = origin.x + viewport.date_to_x(today) + viewport.day_width / 2.0;
    painter.line_segment(
        [Pos2::new(x, origin.y + HEADER_HEIGHT), Pos2::new(x, origin.y + height)],
        Stroke::new(1.5, theme::TODAY_LINE),
    );
}

fn draw_summary_bar(painter: &egui::Painter, rect: Rect, color: Color32) {
    let rect = rect.shrink2(Vec2::new(0.0, 5.0));
    painter.rect_filled(rect, Rounding::same(2.0), theme::faded(color, theme::SUMMARY_ALPHA));
    // End caps mark the span's first and last day.
    for x in [rect.left(), rect.right() - 3.0] {
        painter.rect_filled(
            Rect::from_min_size(Pos2::new(x, rect.top()), Vec2::new(3.0, rect.height() + 4.0)),
            0.0,
            color,
        );
    }
}

fn draw_task_bar(painter: &egui::Painter, bar_rect: Rect, name: &str, color: Color32, highlighted: bool) {
    let rounding = Rounding::same(theme::BAR_ROUNDING);

    painter.rect_filled(bar_rect.translate(Vec2::new(1.0, 2.0)), rounding, Color32::from_black_alpha(35));
    painter.rect_filled(bar_rect, rounding, color);
    painter.rect_filled(
        Rect::from_min_size(bar_rect.min, Vec2::new(bar_rect.width(), (bar_rect.height() * 0.45).max(4.0))),
        Rounding {
            nw: theme::BAR_ROUNDING,
            ne: theme::BAR_ROUNDING,
            sw: 0.0,
            se: 0.0,
        },
        Color32::from_white_alpha(25),
    );

    if highlighted {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
        // Rounded pill handles
        let handle_h = bar_rect.height() * 0.55;
        let handle_y = bar_rect.center().y - handle_h / 2.0;
        for x in [bar_rect.left() - 1.5, bar_rect.right() - 2.5] {
            painter.rect_filled(
                Rect::from_min_size(Pos2::new(x, handle_y), Vec2::new(4.0, handle_h)),
                Rounding::same(2.0),
                theme::HANDLE_COLOR,
            );
        }
    }

    if bar_rect.width() > 30.0 {
        let galley = painter.layout_no_wrap(name.to_string(), theme::font_bar(), theme::TEXT_ON_BAR);
        let text_y = bar_rect.top() + (bar_rect.height() - galley.size().y) / 2.0;
        painter.with_clip_rect(bar_rect).galley(
            Pos2::new(bar_rect.left() + 6.0, text_y),
            galley,
            Color32::TRANSPARENT,
        );
    }
}
