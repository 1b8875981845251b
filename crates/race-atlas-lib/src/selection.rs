//! Selection state
//!
//! The selected year and the active race are the only mutable state of the
//! application. They are owned by a [`SelectionController`]; renderers never
//! touch them directly but report user intent through a [`SelectionSink`].

use crate::dataset::{Dataset, Race, RaceId};

/// Season shown on startup unless configured otherwise
pub const DEFAULT_YEAR: i32 = 2024;

/// Receiver of selection events emitted by the map and list renderers
pub trait SelectionSink {
    /// A race marker or list row was clicked
    fn select(&mut self, race: &Race);

    /// Empty map background was clicked
    fn deselect(&mut self);
}

/// Owner of the selected year and active race
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionController {
    selected_year: i32,
    active_race: Option<RaceId>,
    /// Set when the list should bring the active row into view
    scroll_pending: bool,
}

impl SelectionController {
    pub fn new(initial_year: i32) -> Self {
        Self {
            selected_year: initial_year,
            active_race: None,
            scroll_pending: false,
        }
    }

    pub fn selected_year(&self) -> i32 {
        self.selected_year
    }

    /// Id of the active race, if any. It may belong to another season.
    pub fn active_race(&self) -> Option<&str> {
        self.active_race.as_deref()
    }

    pub fn is_active(&self, race: &Race) -> bool {
        self.active_race.as_deref() == Some(race.id.as_str())
    }

    /// Switch season.
    ///
    /// The active race is kept even when it does not run in `year`; it is then
    /// simply not highlighted anywhere until the user selects again.
    pub fn set_year(&mut self, year: i32) {
        if year == self.selected_year {
            return;
        }
        tracing::debug!("Season {} -> {}", self.selected_year, year);
        self.selected_year = year;
        self.scroll_pending = self.active_race.is_some();
    }

    /// Move the season by `delta`, staying within `range` (inclusive)
    pub fn step_year(&mut self, delta: i32, range: (i32, i32)) {
        let (min, max) = range;
        let year = self.selected_year.saturating_add(delta).clamp(min, max.max(min));
        self.set_year(year);
    }

    pub fn select_race(&mut self, race: &Race) {
        tracing::debug!("Selected race {} ({})", race.id, race.name);
        self.active_race = Some(race.id.clone());
        self.scroll_pending = true;
    }

    pub fn deselect_all(&mut self) {
        if self.active_race.take().is_some() {
            tracing::debug!("Selection cleared");
        }
        self.scroll_pending = false;
    }

    /// Races of the selected season, in round order
    pub fn filtered<'a>(&self, dataset: &'a Dataset) -> Vec<&'a Race> {
        dataset.season(self.selected_year).collect()
    }

    /// The active race, looked up across all seasons
    pub fn active<'a>(&self, dataset: &'a Dataset) -> Option<&'a Race> {
        self.active_race.as_deref().and_then(|id| dataset.race(id))
    }

    /// Consume the pending scroll request.
    ///
    /// Returns true only when the active race has a row in the selected
    /// season; a request for a race of another season is dropped.
    pub fn take_scroll_request(&mut self, dataset: &Dataset) -> bool {
        std::mem::take(&mut self.scroll_pending)
            && self
                .active(dataset)
                .is_some_and(|race| race.year == self.selected_year)
    }
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new(DEFAULT_YEAR)
    }
}

impl SelectionSink for SelectionController {
    fn select(&mut self, race: &Race) {
        self.select_race(race);
    }

    fn deselect(&mut self) {
        self.deselect_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{CircuitRecord, RaceRecord};

    fn dataset() -> Dataset {
        let races = [("1", "2023", "1", "c1"), ("2", "2024", "1", "c2"), ("3", "2024", "2", "c1")]
            .into_iter()
            .map(|(id, year, round, circuit)| RaceRecord {
                race_id: id.to_string(),
                year: year.to_string(),
                round: round.to_string(),
                name: format!("Race {id}"),
                circuit_id: circuit.to_string(),
            })
            .collect::<Vec<_>>();
        let circuits = vec![CircuitRecord {
            circuit_id: "c1".to_string(),
            name: "Monza".to_string(),
            country: "Italy".to_string(),
            lat: "45.6".to_string(),
            lng: "9.3".to_string(),
        }];
        Dataset::join(&races, &circuits, vec![])
    }

    #[test]
    fn test_initial_state() {
        let controller = SelectionController::default();
        assert_eq!(controller.selected_year(), DEFAULT_YEAR);
        assert_eq!(controller.active_race(), None);
    }

    #[test]
    fn test_filtered_matches_year() {
        let dataset = dataset();
        let mut controller = SelectionController::new(2024);
        let ids: Vec<&str> = controller.filtered(&dataset).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);

        controller.set_year(2023);
        let ids: Vec<&str> = controller.filtered(&dataset).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1"]);

        controller.set_year(1950);
        assert!(controller.filtered(&dataset).is_empty());
    }

    #[test]
    fn test_select_then_deselect() {
        let dataset = dataset();
        let mut controller = SelectionController::new(2024);
        let race = dataset.race("2").unwrap();

        controller.select_race(race);
        assert_eq!(controller.active_race(), Some("2"));
        assert!(controller.is_active(race));
        assert!(controller.take_scroll_request(&dataset));
        assert!(!controller.take_scroll_request(&dataset));

        controller.deselect_all();
        assert_eq!(controller.active_race(), None);
        assert!(!controller.is_active(race));
        assert!(controller.active(&dataset).is_none());
    }

    #[test]
    fn test_year_change_keeps_stale_selection() {
        let dataset = dataset();
        let mut controller = SelectionController::new(2024);
        controller.select_race(dataset.race("3").unwrap());
        controller.take_scroll_request(&dataset);

        controller.set_year(2023);
        // The race has no row in 2023, so there is nothing to scroll to
        assert!(!controller.take_scroll_request(&dataset));
        assert_eq!(controller.active_race(), Some("3"));
        assert!(controller.filtered(&dataset).iter().all(|r| !controller.is_active(r)));
        assert_eq!(controller.active(&dataset).map(|r| r.year), Some(2024));
        // Returning to the season scrolls the row back into view
        controller.set_year(2024);
        assert!(controller.take_scroll_request(&dataset));
    }

    #[test]
    fn test_set_year_is_idempotent() {
        let mut controller = SelectionController::new(2023);
        controller.set_year(2024);
        let once = controller.clone();
        controller.set_year(2024);
        assert_eq!(controller, once);
    }

    #[test]
    fn test_step_year_is_bounded() {
        let mut controller = SelectionController::new(2024);
        controller.step_year(1, (1950, 2024));
        assert_eq!(controller.selected_year(), 2024);
        controller.step_year(-1, (1950, 2024));
        assert_eq!(controller.selected_year(), 2023);
        controller.step_year(-100, (1950, 2024));
        assert_eq!(controller.selected_year(), 1950);
    }

    #[test]
    fn test_sink_forwards_to_transitions() {
        let dataset = dataset();
        let mut controller = SelectionController::new(2024);
        {
            let sink: &mut dyn SelectionSink = &mut controller;
            sink.select(dataset.race("2").unwrap());
        }
        assert_eq!(controller.active_race(), Some("2"));
        SelectionSink::deselect(&mut controller);
        assert_eq!(controller.active_race(), None);
    }
}
