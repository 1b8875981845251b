use crate::entrypoints::cli::parse_args;
use clap::Parser;
use race_atlas_lib::{DEFAULT_YEAR, DataSources};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Race Atlas - An interactive map and list of a season's race calendar
pub struct Settings {
    /// Boundary topology (TopoJSON) with a `countries` object
    #[clap(long, value_name = "FILE", default_value = "world.json")]
    pub world: PathBuf,

    /// Races table (CSV with raceId, year, round, name, circuitId)
    #[clap(long, value_name = "FILE", default_value = "races.csv")]
    pub races: PathBuf,

    /// Circuits table (CSV with circuitId, name, country, lat, lng)
    #[clap(long, value_name = "FILE", default_value = "circuits.csv")]
    pub circuits: PathBuf,

    /// Season shown on startup
    #[clap(short, long, default_value_t = DEFAULT_YEAR)]
    pub year: i32,
}

impl Settings {
    /// Parse settings from the command line, exiting with usage on error
    pub fn from_cli() -> Self {
        match parse_args::<Settings>() {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }

    /// Locations of the startup resources
    pub fn sources(&self) -> DataSources {
        DataSources {
            world: self.world.clone(),
            races: self.races.clone(),
            circuits: self.circuits.clone(),
        }
    }
}
