use chrono::Utc;
use egui::{menu, RichText, Ui};
use egui_phosphor::regular as icons;

use crate::app::PlannerApp;
use machine_gantt::model::{ItemStatus, PanDirection, Preset};

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut PlannerApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  "), |ui| {
            if ui.button(format!("{} Open schedule...", icons::FOLDER_OPEN)).clicked() {
                app.open_schedule();
                ui.close_menu();
            }
            if ui
                .add_enabled(
                    app.schedule_path.is_some(),
                    egui::Button::new(format!("{} Reload", icons::ARROWS_CLOCKWISE)),
                )
                .clicked()
            {
                app.reload_schedule();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  "), |ui| {
            ui.label(RichText::new("Statuses").small().weak());
            for status in ItemStatus::ALL {
                let mut shown = app.config.visible_statuses.contains(&status);
                if ui.checkbox(&mut shown, status.label()).changed() {
                    app.toggle_status(status, shown);
                }
            }
            ui.separator();
            let mut hide = app.config.highlight_hides_unrelated;
            if ui.checkbox(&mut hide, "Hide unrelated while highlighting").changed() {
                app.set_hide_unrelated(hide);
            }
        });

        ui.separator();

        let current = app.controller.preset();
        for preset in Preset::ALL {
            if ui.selectable_label(current == preset, preset.label()).clicked() && current != preset {
                app.controller.set_preset(preset);
            }
        }

        ui.separator();

        if ui.button(icons::CARET_LEFT).on_hover_text("Earlier").clicked() {
            app.controller.pan_by(PanDirection::Earlier);
        }
        if ui
            .button(format!("{} Today", icons::CROSSHAIR))
            .on_hover_text("Snap to the current period")
            .clicked()
        {
            app.controller.snap_to_today(Utc::now());
        }
        if ui.button(icons::CARET_RIGHT).on_hover_text("Later").clicked() {
            app.controller.pan_by(PanDirection::Later);
        }

        // Right-aligned schedule name
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let name = app
                .schedule_path
                .as_ref()
                .and_then(|p| p.file_name())
                .and_then(|s| s.to_str())
                .unwrap_or("No schedule loaded");
            ui.label(RichText::new(name).size(11.0).weak());
        });
    });
}
