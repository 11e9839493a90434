use egui::{Color32, Context, RichText, Window};

use crate::app::SchedulerApp;
use crate::ui::theme;
use timeblock_board::engine::DetailTarget;

/// Render the "Book Time" dialog for a finished slot selection.
pub fn show_creation_dialog(app: &mut SchedulerApp, ctx: &Context) {
    let mut create = false;
    let mut cancel = false;
    let Some(draft) = app.creation.as_mut() else {
        return;
    };
    let person = app
        .board
        .resource(draft.proposal.resource_id)
        .map(|r| r.name.clone())
        .unwrap_or_default();

    Window::new(RichText::new("Book Time").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([theme::DIALOG_WIDTH, 0.0])
        .show(ctx, |ui| {
            // Force dark backgrounds inside this dialog
            ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;
            ui.visuals_mut().faint_bg_color = Color32::TRANSPARENT;

            ui.add_space(4.0);
            egui::Grid::new("creation_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Who").color(theme::TEXT_SECONDARY));
                    ui.label(person);
                    ui.end_row();

                    ui.label(RichText::new("When").color(theme::TEXT_SECONDARY));
                    ui.label(format!(
                        "{}  {}",
                        draft.day.format("%a %d %b"),
                        draft.proposal.interval
                    ));
                    ui.end_row();

                    ui.label(RichText::new("Item").color(theme::TEXT_SECONDARY));
                    let selected_title = draft
                        .item_id
                        .and_then(|id| app.board.item(id))
                        .map(|i| i.title.clone())
                        .unwrap_or_else(|| "New item…".to_string());
                    egui::ComboBox::from_label("")
                        .selected_text(selected_title)
                        .width(200.0)
                        .show_ui(ui, |ui| {
                            ui.selectable_value(&mut draft.item_id, None, "New item…");
                            for item in app.board.items.iter().filter(|i| !i.done) {
                                ui.selectable_value(&mut draft.item_id, Some(item.id), &item.title);
                            }
                        });
                    ui.end_row();

                    if draft.item_id.is_none() {
                        ui.label(RichText::new("Title").color(theme::TEXT_SECONDARY));
                        let edit = ui.add_sized(
                            [200.0, 24.0],
                            egui::TextEdit::singleline(&mut draft.title).hint_text("What's it for?"),
                        );
                        if edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                            create = true;
                        }
                        ui.end_row();
                    }
                });

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                let create_btn = egui::Button::new(RichText::new("Create").color(Color32::WHITE))
                    .fill(theme::ACCENT)
                    .rounding(egui::Rounding::same(4.0));
                if ui.add_sized([80.0, 28.0], create_btn).clicked() {
                    create = true;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    cancel = true;
                }
            });
            ui.add_space(2.0);
        });

    if create {
        app.create_from_draft();
    } else if cancel || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.creation = None;
    }
}

/// Render the detail window for a block or task.
pub fn show_detail_dialog(app: &mut SchedulerApp, ctx: &Context) {
    let Some(target) = app.detail else {
        return;
    };
    let mut close = false;
    let mut delete = None;

    Window::new(RichText::new("Details").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([theme::DIALOG_WIDTH, 0.0])
        .show(ctx, |ui| {
            ui.add_space(4.0);
            match target {
                DetailTarget::Block(id) => match app.board.block(id) {
                    Some(block) => {
                        let title = app
                            .board
                            .item(block.item_id)
                            .map(|i| i.title.as_str())
                            .unwrap_or("(missing item)");
                        let person = app
                            .board
                            .resource(block.resource_id)
                            .map(|r| r.name.as_str())
                            .unwrap_or("");
                        ui.heading(title);
                        ui.label(RichText::new(person).color(theme::TEXT_SECONDARY));
                        ui.label(format!(
                            "{}  {}  ({} min)",
                            block.day.format("%a %d %b %Y"),
                            block.interval,
                            block.interval.duration_minutes()
                        ));
                        ui.add_space(6.0);
                        let delete_btn = egui::Button::new(
                            RichText::new(format!("{} Delete", egui_phosphor::regular::TRASH))
                                .color(Color32::WHITE),
                        )
                        .fill(theme::BLOCKED);
                        if ui.add(delete_btn).clicked() {
                            delete = Some(id);
                        }
                    }
                    None => {
                        ui.label("This block no longer exists.");
                    }
                },
                DetailTarget::Task(id) => match app.board.task(id) {
                    Some(task) => {
                        ui.heading(&task.name);
                        if let Some(feature) = app.board.features.iter().find(|f| f.id == task.feature_id) {
                            ui.label(RichText::new(&feature.name).color(theme::TEXT_SECONDARY));
                        }
                        ui.label(format!(
                            "{} → {}  ({} days)",
                            task.dates.start().format("%d/%m/%Y"),
                            task.dates.end().format("%d/%m/%Y"),
                            task.dates.span_days()
                        ));
                        if let Some(person) = task.assignee.and_then(|p| app.board.resource(p)) {
                            ui.label(format!("Assigned to {}", person.name));
                        }
                    }
                    None => {
                        ui.label("This task no longer exists.");
                    }
                },
            }
            ui.add_space(8.0);
            if ui.add_sized([80.0, 28.0], egui::Button::new("Close")).clicked() {
                close = true;
            }
        });

    if let Some(id) = delete {
        app.delete_block(id);
    } else if close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.detail = None;
    }
}

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut SchedulerApp, ctx: &Context) {
    let mut should_close = false;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([theme::DIALOG_WIDTH, 180.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("Timeblock Board").strong());
                ui.add_space(2.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .color(theme::TEXT_SECONDARY),
                );
                ui.add_space(10.0);
                ui.label("Drag across slots to book time,");
                ui.label("drag blocks and bars to reschedule.");
                ui.add_space(14.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
        });
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_about = false;
    }
}
