#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

// The binary uses the library, not duplicate modules
use race_atlas::entrypoints;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    entrypoints::run_native()
}
