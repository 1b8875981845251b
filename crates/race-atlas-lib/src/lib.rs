//! Race Atlas Library - Race calendar data and selection model
//!
//! This library loads a season calendar from three external resources (a
//! boundary topology of the world's countries, a races table and a circuits
//! table), joins them into an immutable race list and exposes the pure view
//! models that the map and list renderers draw from.
//!
//! # Architecture
//!
//! - **[`Dataset`]**: The joined, round-ordered race list plus country geometry
//! - **[`Topology`]**: Decoder for shared-arc boundary topology files
//! - **[`Projection`]** / **[`ZoomTransform`]**: Geographic to canvas to screen transforms
//! - **[`SelectionController`]**: The only mutable state (selected year, active race)
//! - **[`view`]**: Marker, list row, country and tooltip models derived per frame
//!
//! # Data flow
//!
//! Loading happens once. After that the race list is only ever filtered:
//! `Dataset -> SelectionController::filtered -> view::SeasonView -> renderers`.
//! Renderers report clicks back through a [`SelectionSink`].

pub mod country;
mod dataset;
pub mod projection;
mod records;
mod selection;
mod source;
mod topology;
pub mod view;

// Public API exports
pub use country::normalize_country;
pub use dataset::{Circuit, Dataset, LoadReport, Race, RaceId, UNKNOWN_CIRCUIT};
pub use projection::{Projection, ZoomTransform};
pub use records::{CircuitRecord, RaceRecord};
pub use selection::{DEFAULT_YEAR, SelectionController, SelectionSink};
pub use source::{DataSources, RawSources, load_dataset, read_sources};
pub use topology::{COUNTRIES_OBJECT, CountryFeature, Topology};

/// Error types for loading the calendar resources
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to read {name} from {path}: {source}")]
    Io {
        name: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {name}: {source}")]
    Csv {
        name: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("Boundary topology parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Boundary topology has no object named {name:?} (available: {available})")]
    MissingObject { name: String, available: String },

    #[error("Boundary topology references arc {index} but only {count} arcs exist")]
    InvalidArc { index: i64, count: usize },
}

pub type Result<T> = std::result::Result<T, DataError>;
