//! UI panels and overlays
//!
//! Season controls, the race tooltip, the help window and the startup screens.

use crate::app::map_view::MapState;
use egui::{Id, Order, RichText};
use race_atlas_lib::{Dataset, SelectionController};
use race_atlas_lib::projection::CanvasFit;
use race_atlas_lib::view::{self, TOOLTIP_OFFSET_X, Tooltip};

/// Year heading, slider, numeric input and decade picker, plus view actions
pub fn controls_bar(
    ui: &mut egui::Ui,
    selection: &mut SelectionController,
    dataset: &Dataset,
    year_range: (i32, i32),
    map: &mut MapState,
    show_help: &mut bool,
) {
    let (min, max) = year_range;

    ui.horizontal(|ui| {
        ui.heading(format!("Season {}", selection.selected_year()));
        ui.separator();

        // The widgets all edit the same value, so they always agree
        let mut year = selection.selected_year();
        ui.add(
            egui::Slider::new(&mut year, min..=max)
                .show_value(false)
                .text("Year"),
        );
        ui.add(egui::DragValue::new(&mut year).range(min..=max).speed(0.1));
        egui::ComboBox::from_id_salt("decade")
            .selected_text(format!("{}s", year.div_euclid(10) * 10))
            .width(70.0)
            .show_ui(ui, |ui| {
                for start in view::decade_starts(year_range) {
                    let label = format!("{}s", start.div_euclid(10) * 10);
                    ui.selectable_value(&mut year, start, label);
                }
            });
        if year != selection.selected_year() {
            selection.set_year(year);
        }

        let race_count = dataset.season(selection.selected_year()).count();
        ui.label(RichText::new(format!("{race_count} races")).weak());

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("❓").on_hover_text("Help (F1)").clicked() {
                *show_help = !*show_help;
            }
            if ui.button("⟲ Reset view").clicked() {
                map.reset_view();
            }
        });
    });
}

/// Info box for the active race, next to its marker
pub fn race_tooltip(ctx: &egui::Context, tooltip: &Tooltip<'_>, fit: &CanvasFit) {
    let point = fit.to_screen(tooltip.anchor);
    let pos = egui::pos2(point.x as f32 + TOOLTIP_OFFSET_X, point.y as f32);

    egui::Area::new(Id::new("race_tooltip"))
        .fixed_pos(pos)
        .order(Order::Tooltip)
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.label(RichText::new(tooltip.title()).strong());
                for line in tooltip.lines() {
                    ui.label(line);
                }
            });
        });
}

/// Help overlay
pub fn help_overlay(ctx: &egui::Context, show_help: &mut bool) {
    egui::Window::new("Help")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.heading(crate::APP_NAME);
            ui.add_space(8.0);

            ui.label("Browse the race calendar of one season on a world map.");
            ui.add_space(12.0);

            ui.label(RichText::new("Seasons").strong());
            ui.label("• Drag the year slider, type a year or pick a decade");
            ui.label("• Highlighted countries host a race this season");
            ui.add_space(8.0);

            ui.label(RichText::new("Races").strong());
            ui.label("• Click a marker or a list row to select a race");
            ui.label("• Click empty map area to clear the selection");
            ui.add_space(8.0);

            ui.label(RichText::new("Navigation").strong());
            ui.label("• Scroll or pinch to zoom, double-click to zoom in");
            ui.label("• Click and drag to pan");
            ui.add_space(8.0);

            ui.label(RichText::new("Keyboard Shortcuts").strong());
            ui.label("• ← / → - Previous / next season");
            ui.label("• Esc - Clear the selection");
            ui.label("• F1 - Toggle this help");
            ui.add_space(12.0);

            if ui.button("Close").clicked() {
                *show_help = false;
            }
        });
}

/// Shown while the startup resources are read
pub fn loading_screen(ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() / 2.0 - 24.0);
            ui.spinner();
            ui.label("Loading race calendar...");
        });
    });
}

/// Shown instead of the UI when startup failed
pub fn failure_screen(ctx: &egui::Context, message: &str) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.centered_and_justified(|ui| {
            ui.label(
                RichText::new(format!("⚠ Failed to load data: {message}"))
                    .color(ui.visuals().error_fg_color),
            );
        });
    });
}
