use chrono::Duration;
use egui::{menu, RichText, Ui};
use egui_phosphor::regular as icons;

use crate::app::{policy_label, SchedulerApp, View};
use crate::ui::theme;
use timeblock_board::engine::CollisionPolicy;

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut SchedulerApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_menu()), |ui| {
            if ui.button("  Save          Ctrl+S").clicked() {
                app.save_board();
                ui.close_menu();
            }
            if ui.button("  Reload").clicked() {
                app.reload_board();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Load Sample Board").clicked() {
                app.load_sample();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  ").font(theme::font_menu()), |ui| {
            if ui.radio_value(&mut app.view, View::Schedule, "Day schedule").clicked() {
                ui.close_menu();
            }
            if ui.radio_value(&mut app.view, View::Timeline, "Timeline").clicked() {
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Zoom In        Ctrl+Scroll ↑").clicked() {
                app.viewport.zoom_in();
                ui.close_menu();
            }
            if ui.button("  Zoom Out      Ctrl+Scroll ↓").clicked() {
                app.viewport.zoom_out();
                ui.close_menu();
            }
            if ui.button("  Fit Plan").clicked() {
                app.fit_timeline();
                ui.close_menu();
            }
            ui.separator();
            ui.label(RichText::new("Collision checks").small().weak());
            for policy in [CollisionPolicy::MoveOnly, CollisionPolicy::Uniform] {
                let selected = app.settings.collision_policy == policy;
                if ui.radio(selected, policy_label(policy)).clicked() {
                    app.set_collision_policy(policy);
                    ui.close_menu();
                }
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_menu()), |ui| {
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        ui.separator();

        match app.view {
            View::Schedule => {
                let mut day = app.day;
                if ui.button(icons::CARET_LEFT).on_hover_text("Previous day").clicked() {
                    day -= Duration::days(1);
                }
                ui.add(egui_extras::DatePickerButton::new(&mut day).id_salt("toolbar_day"));
                if ui.button(icons::CARET_RIGHT).on_hover_text("Next day").clicked() {
                    day += Duration::days(1);
                }
                if ui.button(format!("{} Today", icons::CALENDAR)).clicked() {
                    day = chrono::Local::now().date_naive();
                }
                app.set_day(day);
            }
            View::Timeline => {
                if ui.button(icons::CARET_LEFT).on_hover_text("Scroll back a week").clicked() {
                    app.viewport.scroll_days(-7);
                }
                if ui.button(icons::CARET_RIGHT).on_hover_text("Scroll forward a week").clicked() {
                    app.viewport.scroll_days(7);
                }
                if ui.button(icons::MAGNIFYING_GLASS_MINUS).clicked() {
                    app.viewport.zoom_out();
                }
                if ui.button(icons::MAGNIFYING_GLASS_PLUS).clicked() {
                    app.viewport.zoom_in();
                }
            }
        }

        // Right-aligned board name
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(RichText::new(&app.board.name).size(11.0).weak());
        });
    });
}
