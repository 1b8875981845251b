//! View models for the map and list renderers
//!
//! Everything here is a pure function of the filtered season, the selection
//! and the current zoom. Renderers draw these models and report clicks back
//! through a [`crate::SelectionSink`]; they keep no state of their own.

use crate::dataset::{Dataset, Race, RaceId};
use crate::projection::{Projection, ZoomTransform};
use crate::selection::{SelectionController, SelectionSink};
use geo::Coord;
use std::collections::{BTreeSet, HashSet};

/// Horizontal offset of the tooltip from the race point, in screen points
pub const TOOLTIP_OFFSET_X: f32 = -50.0;

/// Marker fill, binary by design of the map: highlighted or not
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerFill {
    Default,
    Highlight,
}

impl MarkerFill {
    /// sRGB color of the fill
    pub fn rgb(self) -> [u8; 3] {
        match self {
            Self::Default => [0x67, 0x3a, 0xb7],
            Self::Highlight => [0xff, 0x17, 0x44],
        }
    }
}

/// Outline color of every marker
pub const MARKER_STROKE_RGB: [u8; 3] = [0xff, 0xff, 0xff];

/// One race point on the map, in unzoomed canvas space
#[derive(Debug, Clone, PartialEq)]
pub struct Marker<'a> {
    pub race: &'a Race,
    pub center: Coord<f64>,
    /// Radius in canvas units, already divided by the zoom factor
    pub radius: f64,
    /// Stroke width in canvas units, already divided by the zoom factor
    pub stroke_width: f64,
    pub fill: MarkerFill,
}

/// One row of the race list
#[derive(Debug, Clone, PartialEq)]
pub struct ListRow<'a> {
    pub race: &'a Race,
    /// Stable element id, `list-item-{race id}`
    pub element_id: String,
    pub selected: bool,
}

/// Styling flags of a country polygon
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountryStyle {
    /// Hosted a race in any season
    pub has_history: bool,
    /// Hosts a race in the selected season
    pub active_season: bool,
}

/// Info panel for the active race
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip<'a> {
    pub race: &'a Race,
    /// Race point in zoomed canvas space
    pub anchor: Coord<f64>,
}

/// The selected season, as both renderers see it
#[derive(Debug, Clone)]
pub struct SeasonView<'a> {
    pub year: i32,
    /// Races of the season in round order; later rounds draw on top
    pub races: Vec<&'a Race>,
    pub active_race: Option<RaceId>,
    active_countries: HashSet<&'a str>,
}

impl<'a> SeasonView<'a> {
    pub fn new(dataset: &'a Dataset, selection: &SelectionController) -> Self {
        profiling::scope!("SeasonView::new");

        let races = selection.filtered(dataset);
        let active_countries = races.iter().map(|&race| race.country.as_str()).collect();
        Self {
            year: selection.selected_year(),
            races,
            active_race: selection.active_race().map(str::to_string),
            active_countries,
        }
    }

    fn is_active(&self, race: &Race) -> bool {
        self.active_race.as_deref() == Some(race.id.as_str())
    }

    /// One marker per race of the season, keyed by race id
    pub fn markers(&self, projection: &Projection, zoom: &ZoomTransform) -> Vec<Marker<'a>> {
        self.races
            .iter()
            .map(|&race| Marker {
                race,
                center: projection.project(race.lng, race.lat),
                radius: zoom.marker_radius(),
                stroke_width: zoom.marker_stroke_width(),
                fill: if self.is_active(race) {
                    MarkerFill::Highlight
                } else {
                    MarkerFill::Default
                },
            })
            .collect()
    }

    /// One list row per race of the season
    pub fn rows(&self) -> Vec<ListRow<'a>> {
        self.races
            .iter()
            .map(|&race| ListRow {
                race,
                element_id: race.list_item_id(),
                selected: self.is_active(race),
            })
            .collect()
    }

    /// Style of a country polygon given the all-time racing countries.
    ///
    /// Unnamed polygons never match, even though races without a circuit
    /// carry an empty country.
    pub fn country_style(&self, name: &str, racing_countries: &BTreeSet<String>) -> CountryStyle {
        if name.is_empty() {
            return CountryStyle::default();
        }
        CountryStyle {
            has_history: racing_countries.contains(name),
            active_season: self.active_countries.contains(name),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.races.is_empty()
    }
}

/// Topmost marker under a point given in unzoomed canvas space
pub fn hit_test<'m, 'a>(markers: &'m [Marker<'a>], point: Coord<f64>) -> Option<&'m Marker<'a>> {
    markers.iter().rev().find(|marker| {
        let dx = marker.center.x - point.x;
        let dy = marker.center.y - point.y;
        let reach = marker.radius + marker.stroke_width / 2.0;
        dx * dx + dy * dy <= reach * reach
    })
}

/// Turn a click on the map into exactly one selection event.
///
/// `point` is the click in unzoomed canvas space; `None` (no pointer position)
/// counts as empty map. Returns the selected race, if any.
pub fn resolve_click<'a>(
    markers: &[Marker<'a>],
    point: Option<Coord<f64>>,
    sink: &mut impl SelectionSink,
) -> Option<&'a Race> {
    match point.and_then(|p| hit_test(markers, p)) {
        Some(marker) => {
            sink.select(marker.race);
            Some(marker.race)
        }
        None => {
            sink.deselect();
            None
        }
    }
}

/// First year of every decade that overlaps `range` (inclusive), clamped into it
pub fn decade_starts(range: (i32, i32)) -> Vec<i32> {
    let (min, max) = range;
    if max < min {
        return Vec::new();
    }
    let first = min.div_euclid(10) * 10;
    (first..=max)
        .step_by(10)
        .map(|decade| decade.max(min))
        .collect()
}

/// Tooltip for the active race, positioned under the live zoom transform
pub fn tooltip<'a>(
    active: Option<&'a Race>,
    projection: &Projection,
    zoom: &ZoomTransform,
) -> Option<Tooltip<'a>> {
    let race = active?;
    Some(Tooltip {
        race,
        anchor: zoom.apply(projection.project(race.lng, race.lat)),
    })
}

impl Tooltip<'_> {
    pub fn title(&self) -> &str {
        &self.race.name
    }

    /// Detail lines under the title
    pub fn lines(&self) -> [String; 3] {
        [
            format!("Circuit: {}", self.race.circuit_name),
            format!("Race Number: {}", self.race.round),
            format!("Country: {}", self.race.country),
        ]
    }
}
