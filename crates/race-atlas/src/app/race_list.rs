//! Race list renderer

use egui::{Align, CursorIcon, Id, Margin, RichText, ScrollArea, Sense, Ui};
use race_atlas_lib::SelectionSink;
use race_atlas_lib::view::{ListRow, SeasonView};

/// Draw one row per race of the season.
///
/// When `scroll_to_active` is set the selected row is scrolled to the center
/// of the list.
pub fn show(
    ui: &mut Ui,
    season: &SeasonView<'_>,
    scroll_to_active: bool,
    sink: &mut impl SelectionSink,
) {
    profiling::scope!("race_list::show");

    ui.label(RichText::new(format!("🏁 Races in {}", season.year)).strong());
    ui.add_space(6.0);

    if season.is_empty() {
        ui.label(RichText::new(format!("No races in {}", season.year)).italics().weak());
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for row in season.rows() {
                row_ui(ui, &row, scroll_to_active, sink);
                ui.add_space(2.0);
            }
        });
}

fn row_ui(ui: &mut Ui, row: &ListRow<'_>, scroll_to_active: bool, sink: &mut impl SelectionSink) {
    let visuals = ui.visuals();
    let fill = if row.selected {
        visuals.selection.bg_fill
    } else {
        visuals.faint_bg_color
    };

    let frame = egui::Frame::new()
        .fill(fill)
        .inner_margin(Margin::symmetric(8, 4))
        .corner_radius(4.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(RichText::new(format!("{:>2}", row.race.round)).monospace().weak());
                ui.vertical(|ui| {
                    ui.label(RichText::new(&row.race.name).strong());
                    ui.label(RichText::new(&row.race.circuit_name).small().weak());
                });
            });
        });

    let response = ui
        .interact(frame.response.rect, Id::new(&row.element_id), Sense::click())
        .on_hover_cursor(CursorIcon::PointingHand);

    if response.clicked() {
        sink.select(row.race);
    }
    if row.selected && scroll_to_active {
        response.scroll_to_me(Some(Align::Center));
    }
}
