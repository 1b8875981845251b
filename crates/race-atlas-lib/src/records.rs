//! Raw table rows for the races and circuits resources
//!
//! Rows are deserialized by header name, so extra columns in the source files
//! are ignored. Numeric columns are kept as text here and coerced during the
//! join, where a row that fails coercion can be reported and skipped.

use crate::{DataError, Result};
use serde::Deserialize;

/// One row of the races table
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RaceRecord {
    #[serde(rename = "raceId")]
    pub race_id: String,
    pub year: String,
    pub round: String,
    pub name: String,
    #[serde(rename = "circuitId")]
    pub circuit_id: String,
}

/// One row of the circuits table
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CircuitRecord {
    #[serde(rename = "circuitId")]
    pub circuit_id: String,
    pub name: String,
    pub country: String,
    pub lat: String,
    pub lng: String,
}

impl RaceRecord {
    /// Season year, if the column holds an integer
    pub fn parsed_year(&self) -> Option<i32> {
        self.year.trim().parse().ok()
    }

    /// Round number, if the column holds an integer
    pub fn parsed_round(&self) -> Option<u32> {
        self.round.trim().parse().ok()
    }
}

impl CircuitRecord {
    /// Latitude and longitude in degrees, if both columns hold numbers
    pub fn parsed_position(&self) -> Option<(f64, f64)> {
        let lat = self.lat.trim().parse::<f64>().ok()?;
        let lng = self.lng.trim().parse::<f64>().ok()?;
        (lat.is_finite() && lng.is_finite()).then_some((lat, lng))
    }
}

/// Parse the races table
pub fn read_races(text: &str) -> Result<Vec<RaceRecord>> {
    read_table("races", text)
}

/// Parse the circuits table
pub fn read_circuits(text: &str) -> Result<Vec<CircuitRecord>> {
    read_table("circuits", text)
}

fn read_table<T: for<'de> Deserialize<'de>>(name: &'static str, text: &str) -> Result<Vec<T>> {
    profiling::scope!("read_table");

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, csv::Error>>()
        .map_err(|source| DataError::Csv { name, source })
}
