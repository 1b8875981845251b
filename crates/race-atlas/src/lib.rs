//! Race Atlas - Application Library
//!
//! This is the application crate that puts the calendar data, the selection
//! state and the egui renderers together into a desktop app.

mod app;
pub mod entrypoints;

pub use app::RaceAtlasApp;

/// Window title and application name
pub const APP_NAME: &str = "Race Atlas";
