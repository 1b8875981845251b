//! Application module
//!
//! This module provides the main application structure:
//! - Season controls in a top bar
//! - The race list of the season in a side panel
//! - The world map with race markers filling the rest of the window
//! - A tooltip for the active race, anchored to its marker
//!
//! Nothing is persisted between launches.

mod map_view;
mod race_list;
pub(crate) mod settings;
mod state;
mod ui_panels;

use crate::app::settings::Settings;
use crate::app::state::{AppState, LoadState};
use eframe::egui;
use race_atlas_lib::view::{self, SeasonView};

/// Keyboard shortcuts read once per frame
struct Shortcuts {
    toggle_help: bool,
    deselect: bool,
    year_step: i32,
}

impl Shortcuts {
    fn read(ctx: &egui::Context) -> Self {
        // Keys typed into a text field belong to that field
        let typing = ctx.memory(|m| m.focused().is_some());
        ctx.input(|i| Self {
            toggle_help: i.key_pressed(egui::Key::F1),
            deselect: !typing && i.key_pressed(egui::Key::Escape),
            year_step: if typing {
                0
            } else {
                i32::from(i.key_pressed(egui::Key::ArrowRight))
                    - i32::from(i.key_pressed(egui::Key::ArrowLeft))
            },
        })
    }
}

/// Main application structure
pub struct RaceAtlasApp {
    /// Application state (load lifecycle, selection, map camera)
    state: AppState,
}

impl RaceAtlasApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = Settings::from_cli();
        tracing::info!("Starting with season {}", settings.year);

        Self {
            state: AppState::new(&settings, &cc.egui_ctx),
        }
    }
}

#[profiling::all_functions]
impl eframe::App for RaceAtlasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_load();
        let shortcuts = Shortcuts::read(ctx);

        let AppState {
            load,
            selection,
            map,
            show_help,
        } = &mut self.state;

        let loaded = match load {
            LoadState::Loading { .. } => {
                ui_panels::loading_screen(ctx);
                return;
            }
            LoadState::Failed(message) => {
                ui_panels::failure_screen(ctx, message);
                return;
            }
            LoadState::Ready(loaded) => &**loaded,
        };
        let dataset = &loaded.dataset;
        let before = selection.clone();

        if shortcuts.toggle_help {
            *show_help = !*show_help;
        }
        if shortcuts.deselect {
            selection.deselect_all();
        }
        if shortcuts.year_step != 0 {
            selection.step_year(shortcuts.year_step, loaded.year_range);
        }

        if *show_help {
            ui_panels::help_overlay(ctx, show_help);
        }

        egui::TopBottomPanel::top("season_controls").show(ctx, |ui| {
            ui_panels::controls_bar(ui, selection, dataset, loaded.year_range, map, show_help);
        });

        // Both renderers see the same season for the whole frame
        let season = SeasonView::new(dataset, selection);
        let scroll_to_active = selection.take_scroll_request(dataset);

        egui::SidePanel::right("race_list")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| {
                race_list::show(ui, &season, scroll_to_active, &mut *selection);
            });

        let fit = egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                profiling::scope!("map_panel");
                map_view::show(
                    ui,
                    map,
                    &loaded.countries,
                    dataset.racing_countries(),
                    &season,
                    &mut *selection,
                )
            })
            .inner;

        if let Some(tooltip) = view::tooltip(selection.active(dataset), &map.projection, &map.zoom) {
            ui_panels::race_tooltip(ctx, &tooltip, &fit);
        }

        // Clicks handled after a panel was drawn show up on the next frame
        if *selection != before {
            ctx.request_repaint();
        }
    }
}
