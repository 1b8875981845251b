//! Native entry point, argument parsing and logging setup

pub(crate) mod cli;
mod logging;
mod run;

pub use run::run_native;
