//! Dataset - The joined race calendar
//!
//! Races are joined to their circuits once at startup. The resulting list is
//! immutable and ordered by round; every view is a filter over it.

use crate::country::normalize_country;
use crate::records::{CircuitRecord, RaceRecord, read_circuits, read_races};
use crate::source::RawSources;
use crate::topology::{COUNTRIES_OBJECT, CountryFeature, Topology};
use crate::Result;
use std::collections::{BTreeSet, HashMap};

/// Identifier of a race, as found in the races table
pub type RaceId = String;

/// Circuit name substituted when a race references an unknown circuit
pub const UNKNOWN_CIRCUIT: &str = "Unknown";

/// A racing venue
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    pub id: String,
    pub name: String,
    /// Country as written in the circuits table (not normalized)
    pub country: String,
    pub lat: f64,
    pub lng: f64,
}

/// A race joined with its circuit
#[derive(Debug, Clone, PartialEq)]
pub struct Race {
    pub id: RaceId,
    pub year: i32,
    /// 1-based position within the season
    pub round: u32,
    pub name: String,
    pub circuit_name: String,
    /// Canonical country name (see [`normalize_country`])
    pub country: String,
    pub lat: f64,
    pub lng: f64,
}

/// Counters describing what the join kept and dropped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Races in the final list
    pub races: usize,
    /// Circuits available for the join
    pub circuits: usize,
    /// Country features decoded from the boundary topology
    pub countries: usize,
    /// Race rows dropped because year or round was not an integer
    pub skipped_races: usize,
    /// Circuit rows dropped because lat or lng was not a number
    pub skipped_circuits: usize,
    /// Races whose circuit could not be found
    pub unresolved_circuits: usize,
}

/// The complete, immutable calendar
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    races: Vec<Race>,
    racing_countries: BTreeSet<String>,
    countries: Vec<CountryFeature>,
    report: LoadReport,
}

impl Circuit {
    /// Build a circuit from its table row, rejecting rows without a valid position
    pub fn from_record(record: &CircuitRecord) -> Option<Self> {
        let (lat, lng) = record.parsed_position()?;
        Some(Self {
            id: record.circuit_id.clone(),
            name: record.name.clone(),
            country: record.country.clone(),
            lat,
            lng,
        })
    }
}

impl Race {
    /// Join one race row with its circuit.
    ///
    /// A missing circuit is not an error: the race keeps the `Unknown` name
    /// and sits at (0, 0) so that it still shows up.
    fn join(record: &RaceRecord, year: i32, round: u32, circuit: Option<&Circuit>) -> Self {
        Self {
            id: record.race_id.clone(),
            year,
            round,
            name: record.name.clone(),
            circuit_name: circuit
                .map(|c| c.name.clone())
                .unwrap_or_else(|| UNKNOWN_CIRCUIT.to_string()),
            country: normalize_country(circuit.map(|c| c.country.as_str()).unwrap_or("")),
            lat: circuit.map(|c| c.lat).unwrap_or(0.0),
            lng: circuit.map(|c| c.lng).unwrap_or(0.0),
        }
    }

    /// DOM-style element id of this race's list row
    pub fn list_item_id(&self) -> String {
        format!("list-item-{}", self.id)
    }
}

impl Dataset {
    /// Parse the three raw resources and join them
    pub fn from_sources(raw: &RawSources) -> Result<Self> {
        profiling::scope!("Dataset::from_sources");

        let topology = Topology::from_json(&raw.world)?;
        let countries = topology.features(COUNTRIES_OBJECT)?;
        let races = read_races(&raw.races)?;
        let circuits = read_circuits(&raw.circuits)?;

        Ok(Self::join(&races, &circuits, countries))
    }

    /// Join race rows to circuit rows and sort by round.
    ///
    /// Rows whose numeric columns do not parse are skipped with a warning.
    /// When several circuit rows share an id the last one wins.
    pub fn join(
        race_records: &[RaceRecord],
        circuit_records: &[CircuitRecord],
        countries: Vec<CountryFeature>,
    ) -> Self {
        profiling::scope!("Dataset::join");

        let mut report = LoadReport {
            countries: countries.len(),
            ..Default::default()
        };

        let mut circuits: HashMap<&str, Circuit> = HashMap::new();
        for record in circuit_records {
            match Circuit::from_record(record) {
                Some(circuit) => {
                    circuits.insert(record.circuit_id.as_str(), circuit);
                }
                None => {
                    tracing::warn!(
                        "Skipping circuit {:?}: invalid position ({:?}, {:?})",
                        record.circuit_id,
                        record.lat,
                        record.lng
                    );
                    report.skipped_circuits += 1;
                }
            }
        }
        report.circuits = circuits.len();

        let mut races: Vec<Race> = Vec::with_capacity(race_records.len());
        for record in race_records {
            let (Some(year), Some(round)) = (record.parsed_year(), record.parsed_round()) else {
                tracing::warn!(
                    "Skipping race {:?}: year {:?} / round {:?} is not an integer",
                    record.race_id,
                    record.year,
                    record.round
                );
                report.skipped_races += 1;
                continue;
            };

            let circuit = circuits.get(record.circuit_id.as_str());
            if circuit.is_none() {
                tracing::debug!(
                    "Race {:?} references unknown circuit {:?}",
                    record.race_id,
                    record.circuit_id
                );
                report.unresolved_circuits += 1;
            }
            races.push(Race::join(record, year, round, circuit));
        }

        // Stable: equal rounds keep their file order
        races.sort_by_key(|race| race.round);
        report.races = races.len();

        let racing_countries = races.iter().map(|race| race.country.clone()).collect();

        Self {
            races,
            racing_countries,
            countries,
            report,
        }
    }

    /// All races, ordered by round
    pub fn races(&self) -> &[Race] {
        &self.races
    }

    /// Races of one season, ordered by round
    pub fn season(&self, year: i32) -> impl Iterator<Item = &Race> {
        self.races.iter().filter(move |race| race.year == year)
    }

    /// Look up a race by id across all seasons
    pub fn race(&self, id: &str) -> Option<&Race> {
        self.races.iter().find(|race| race.id == id)
    }

    /// Every country that hosted at least one race, in any year
    pub fn racing_countries(&self) -> &BTreeSet<String> {
        &self.racing_countries
    }

    /// Country outlines from the boundary topology
    pub fn countries(&self) -> &[CountryFeature] {
        &self.countries
    }

    /// First and last season present, if any race was loaded
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let min = self.races.iter().map(|race| race.year).min()?;
        let max = self.races.iter().map(|race| race.year).max()?;
        Some((min, max))
    }

    /// What the join kept and dropped
    pub fn report(&self) -> &LoadReport {
        &self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn race(id: &str, year: &str, round: &str, circuit_id: &str) -> RaceRecord {
        RaceRecord {
            race_id: id.to_string(),
            year: year.to_string(),
            round: round.to_string(),
            name: format!("Race {id}"),
            circuit_id: circuit_id.to_string(),
        }
    }

    fn circuit(id: &str, name: &str, country: &str, lat: &str, lng: &str) -> CircuitRecord {
        CircuitRecord {
            circuit_id: id.to_string(),
            name: name.to_string(),
            country: country.to_string(),
            lat: lat.to_string(),
            lng: lng.to_string(),
        }
    }

    #[test]
    fn test_unresolved_circuit_uses_sentinel() {
        let races = vec![race("1", "2023", "1", "c1"), race("2", "2024", "1", "c2")];
        let circuits = vec![circuit("c1", "Monza", "Italy", "45.6", "9.3")];
        let dataset = Dataset::join(&races, &circuits, vec![]);

        let monza = dataset.race("1").unwrap();
        assert_eq!(monza.circuit_name, "Monza");
        assert_eq!(monza.country, "Italy");
        assert_eq!(monza.year, 2023);
        assert!((monza.lat - 45.6).abs() < 1e-9);
        assert!((monza.lng - 9.3).abs() < 1e-9);

        let unknown = dataset.race("2").unwrap();
        assert_eq!(unknown.circuit_name, UNKNOWN_CIRCUIT);
        assert_eq!(unknown.country, "");
        assert_eq!(unknown.lat, 0.0);
        assert_eq!(unknown.lng, 0.0);
        assert_eq!(dataset.report().unresolved_circuits, 1);
    }

    #[test]
    fn test_races_sorted_by_round_stably() {
        let races = vec![
            race("a", "2024", "3", "c1"),
            race("b", "2023", "1", "c1"),
            race("c", "2024", "1", "c1"),
            race("d", "2024", "2", "c1"),
        ];
        let circuits = vec![circuit("c1", "Monza", "Italy", "45.6", "9.3")];
        let dataset = Dataset::join(&races, &circuits, vec![]);

        let ids: Vec<&str> = dataset.races().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "d", "a"]);

        let season: Vec<u32> = dataset.season(2024).map(|r| r.round).collect();
        assert_eq!(season, vec![1, 2, 3]);
    }

    #[test]
    fn test_season_is_exact_year_filter() {
        let races = vec![
            race("1", "2022", "2", "c1"),
            race("2", "2023", "1", "c1"),
            race("3", "2022", "1", "c1"),
        ];
        let dataset = Dataset::join(&races, &[], vec![]);

        for year in 2020..2025 {
            let season: Vec<&Race> = dataset.season(year).collect();
            assert!(season.iter().all(|r| r.year == year));
            assert_eq!(
                season.len(),
                dataset.races().iter().filter(|r| r.year == year).count()
            );
            assert!(season.windows(2).all(|w| w[0].round <= w[1].round));
        }
        assert_eq!(dataset.year_range(), Some((2022, 2023)));
    }

    #[test]
    fn test_countries_are_normalized() {
        let races = vec![
            race("1", "2024", "1", "silverstone"),
            race("2", "2024", "2", "cota"),
            race("3", "2010", "1", "yeongam"),
        ];
        let circuits = vec![
            circuit("silverstone", "Silverstone Circuit", "UK", "52.07", "-1.01"),
            circuit("cota", "Circuit of the Americas", "USA", "30.13", "-97.64"),
            circuit("yeongam", "Korean International Circuit", "Korea", "34.73", "126.41"),
        ];
        let dataset = Dataset::join(&races, &circuits, vec![]);

        let countries: Vec<&str> = dataset
            .racing_countries()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(
            countries,
            vec!["South Korea", "United Kingdom", "United States of America"]
        );
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let races = vec![
            race("1", "2024", "1", "c1"),
            race("2", "twenty", "2", "c1"),
            race("3", "2024", "", "c1"),
        ];
        let circuits = vec![
            circuit("c1", "Monza", "Italy", "45.6", "9.3"),
            circuit("c2", "Nowhere", "Atlantis", "\\N", "0"),
        ];
        let dataset = Dataset::join(&races, &circuits, vec![]);

        assert_eq!(dataset.races().len(), 1);
        let report = dataset.report();
        assert_eq!(report.races, 1);
        assert_eq!(report.skipped_races, 2);
        assert_eq!(report.circuits, 1);
        assert_eq!(report.skipped_circuits, 1);
    }

    #[test]
    fn test_list_item_id() {
        let dataset = Dataset::join(&[race("42", "2024", "1", "x")], &[], vec![]);
        assert_eq!(dataset.race("42").unwrap().list_item_id(), "list-item-42");
    }

    #[test]
    fn test_empty_dataset_has_no_year_range() {
        let dataset = Dataset::default();
        assert_eq!(dataset.year_range(), None);
        assert!(dataset.race("1").is_none());
    }
}
