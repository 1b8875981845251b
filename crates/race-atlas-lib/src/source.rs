//! Loading of the three startup resources
//!
//! The resources are independent, so they are read concurrently and joined
//! before the dataset is built. Any failure aborts the whole load; there is no
//! partial dataset.

use crate::dataset::Dataset;
use crate::{DataError, Result};
use std::path::{Path, PathBuf};

/// Locations of the startup resources
#[derive(Debug, Clone, PartialEq)]
pub struct DataSources {
    /// Boundary topology (TopoJSON) with a `countries` object
    pub world: PathBuf,
    /// Races table (CSV)
    pub races: PathBuf,
    /// Circuits table (CSV)
    pub circuits: PathBuf,
}

/// Unparsed contents of the startup resources
#[derive(Debug, Clone, Default)]
pub struct RawSources {
    pub world: String,
    pub races: String,
    pub circuits: String,
}

impl Default for DataSources {
    fn default() -> Self {
        Self {
            world: PathBuf::from("world.json"),
            races: PathBuf::from("races.csv"),
            circuits: PathBuf::from("circuits.csv"),
        }
    }
}

/// Read all three resources concurrently
pub async fn read_sources(sources: &DataSources) -> Result<RawSources> {
    let (world, races, circuits) = tokio::try_join!(
        read_source("world", &sources.world),
        read_source("races", &sources.races),
        read_source("circuits", &sources.circuits),
    )?;

    Ok(RawSources {
        world,
        races,
        circuits,
    })
}

/// Read, parse and join the startup resources
pub async fn load_dataset(sources: &DataSources) -> Result<Dataset> {
    let raw = read_sources(sources).await?;
    let dataset = Dataset::from_sources(&raw)?;

    let report = dataset.report();
    tracing::info!(
        "Loaded {} races, {} circuits and {} countries ({} races and {} circuits skipped, {} races without circuit)",
        report.races,
        report.circuits,
        report.countries,
        report.skipped_races,
        report.skipped_circuits,
        report.unresolved_circuits
    );

    Ok(dataset)
}

async fn read_source(name: &'static str, path: &Path) -> Result<String> {
    tracing::debug!("Reading {} from {}", name, path.display());
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DataError::Io {
            name,
            path: path.display().to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD: &str = r#"{
        "type": "Topology",
        "arcs": [[[5, 40], [15, 40], [15, 47], [5, 47], [5, 40]]],
        "objects": {
            "countries": {
                "type": "GeometryCollection",
                "geometries": [{"type": "Polygon", "arcs": [[0]], "properties": {"name": "Italy"}}]
            }
        }
    }"#;

    const RACES: &str = "raceId,year,round,circuitId,name\n\
        1,2023,1,c1,Italian Grand Prix\n\
        2,2024,1,c2,Mystery Grand Prix\n";

    const CIRCUITS: &str = "circuitId,name,country,lat,lng\n\
        c1,Monza,Italy,45.6,9.3\n";

    fn write_fixture(test: &str) -> DataSources {
        let dir = std::env::temp_dir().join(format!("race-atlas-{}-{}", test, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let sources = DataSources {
            world: dir.join("world.json"),
            races: dir.join("races.csv"),
            circuits: dir.join("circuits.csv"),
        };
        std::fs::write(&sources.world, WORLD).unwrap();
        std::fs::write(&sources.races, RACES).unwrap();
        std::fs::write(&sources.circuits, CIRCUITS).unwrap();
        sources
    }

    #[tokio::test]
    async fn test_load_dataset_from_files() {
        let sources = write_fixture("load");
        let dataset = load_dataset(&sources).await.unwrap();

        assert_eq!(dataset.races().len(), 2);
        assert_eq!(dataset.countries().len(), 1);
        assert_eq!(dataset.countries()[0].name, "Italy");
        assert!(dataset.racing_countries().contains("Italy"));
        assert!(dataset.racing_countries().contains(""));
        assert_eq!(dataset.race("2").unwrap().circuit_name, "Unknown");
    }

    #[tokio::test]
    async fn test_missing_source_is_named() {
        let mut sources = write_fixture("missing");
        sources.circuits = sources.circuits.with_file_name("does-not-exist.csv");

        match load_dataset(&sources).await {
            Err(DataError::Io { name, path, .. }) => {
                assert_eq!(name, "circuits");
                assert!(path.ends_with("does-not-exist.csv"));
            }
            other => panic!("expected an IO error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_world_is_fatal() {
        let sources = write_fixture("malformed");
        std::fs::write(&sources.world, "not json").unwrap();
        assert!(matches!(
            load_dataset(&sources).await,
            Err(DataError::Json(_))
        ));
    }

    #[test]
    fn test_default_sources() {
        let sources = DataSources::default();
        assert_eq!(sources.world, PathBuf::from("world.json"));
        assert_eq!(sources.races, PathBuf::from("races.csv"));
        assert_eq!(sources.circuits, PathBuf::from("circuits.csv"));
    }
}
