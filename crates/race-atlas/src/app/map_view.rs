//! Map renderer
//!
//! Draws the country layer and one marker per race of the selected season on
//! a pannable, zoomable Mercator canvas. Clicks are resolved here and reported
//! through a [`SelectionSink`]: a marker hit selects its race, anything else
//! clears the selection. Exactly one of the two is emitted per click.

use egui::{Color32, CursorIcon, Sense, Shape, Stroke, Ui};
use geo::{BoundingRect, Contains, Coord, MultiPolygon, Point, Rect, TriangulateEarcut};
use race_atlas_lib::projection::CanvasFit;
use race_atlas_lib::view::{self, CountryStyle, MARKER_STROKE_RGB, MarkerFill, SeasonView};
use race_atlas_lib::{CountryFeature, Projection, SelectionSink, ZoomTransform};
use std::collections::BTreeSet;

const SEA: Color32 = Color32::from_rgb(0xf4, 0xf6, 0xfb);
const COUNTRY_FILL: Color32 = Color32::from_rgb(0xdd, 0xdd, 0xdd);
const HISTORY_FILL: Color32 = Color32::from_rgb(0xd1, 0xc4, 0xe9);
const ACTIVE_SEASON_FILL: Color32 = Color32::from_rgb(0x95, 0x75, 0xcd);
const BORDER: Color32 = Color32::WHITE;

/// Shape of a legend swatch
#[derive(Debug, Clone, Copy, PartialEq)]
enum Swatch {
    Area(Color32),
    Marker(Color32),
}

/// Map key, one entry per fill used on the map
fn legend_entries() -> [(&'static str, Swatch); 5] {
    [
        ("Race this season", Swatch::Area(ACTIVE_SEASON_FILL)),
        ("Raced in other seasons", Swatch::Area(HISTORY_FILL)),
        ("Never raced", Swatch::Area(COUNTRY_FILL)),
        ("Race", Swatch::Marker(rgb(MarkerFill::Default.rgb()))),
        ("Selected race", Swatch::Marker(rgb(MarkerFill::Highlight.rgb()))),
    ]
}

/// Scroll points per e-fold of zoom
const SCROLL_ZOOM_SPEED: f64 = 0.002;

/// Camera of the map view
pub struct MapState {
    /// Fixed at startup
    pub projection: Projection,
    /// User pan/zoom
    pub zoom: ZoomTransform,
}

impl Default for MapState {
    fn default() -> Self {
        Self {
            projection: Projection::mercator(),
            zoom: ZoomTransform::identity(),
        }
    }
}

impl MapState {
    pub fn reset_view(&mut self) {
        self.zoom = ZoomTransform::identity();
    }
}

/// A country prepared for drawing
pub struct CountryShape {
    pub name: String,
    /// Longitude/latitude outline, for hover lookups
    geometry: MultiPolygon<f64>,
    bounds: Option<Rect<f64>>,
    /// Fill triangles in canvas space
    triangles: Vec<[Coord<f64>; 3]>,
    /// Exterior rings in canvas space
    outlines: Vec<Vec<Coord<f64>>>,
}

/// All countries, triangulated and projected once
#[derive(Default)]
pub struct CountryLayer {
    shapes: Vec<CountryShape>,
}

impl CountryLayer {
    pub fn new(features: &[CountryFeature], projection: &Projection) -> Self {
        profiling::scope!("CountryLayer::new");

        let project = |c: Coord<f64>| projection.project(c.x, c.y);
        let shapes: Vec<CountryShape> = features
            .iter()
            .map(|feature| {
                let triangles = feature
                    .geometry
                    .iter()
                    .flat_map(|polygon| polygon.earcut_triangles_iter())
                    .map(|triangle| triangle.to_array().map(project))
                    .collect();
                let outlines = feature
                    .geometry
                    .iter()
                    .map(|polygon| polygon.exterior().coords().copied().map(project).collect())
                    .collect();
                CountryShape {
                    name: feature.name.clone(),
                    geometry: feature.geometry.clone(),
                    bounds: feature.geometry.bounding_rect(),
                    triangles,
                    outlines,
                }
            })
            .collect();

        tracing::debug!(
            "Prepared {} countries ({} triangles)",
            shapes.len(),
            shapes.iter().map(|s| s.triangles.len()).sum::<usize>()
        );
        Self { shapes }
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Country containing the given position, if any
    pub fn country_at(&self, lng: f64, lat: f64) -> Option<&CountryShape> {
        let point = Point::new(lng, lat);
        self.shapes.iter().find(|shape| {
            shape.bounds.is_some_and(|b| {
                lng >= b.min().x && lng <= b.max().x && lat >= b.min().y && lat <= b.max().y
            }) && shape.geometry.contains(&point)
        })
    }
}

fn country_fill(style: CountryStyle) -> Color32 {
    if style.active_season {
        ACTIVE_SEASON_FILL
    } else if style.has_history {
        HISTORY_FILL
    } else {
        COUNTRY_FILL
    }
}

fn rgb([r, g, b]: [u8; 3]) -> Color32 {
    Color32::from_rgb(r, g, b)
}

fn to_coord(pos: egui::Pos2) -> Coord<f64> {
    Coord {
        x: pos.x as f64,
        y: pos.y as f64,
    }
}

fn to_pos(coord: Coord<f64>) -> egui::Pos2 {
    egui::pos2(coord.x as f32, coord.y as f32)
}

/// Apply drag, scroll, pinch and double-click to the camera
fn handle_navigation(ui: &Ui, response: &egui::Response, map: &mut MapState, fit: &CanvasFit) {
    if response.dragged() {
        let delta = response.drag_delta();
        map.zoom
            .translate_by(delta.x as f64 / fit.scale, delta.y as f64 / fit.scale);
    }

    let Some(hover) = response.hover_pos() else {
        return;
    };
    let (scroll, pinch) = ui.input(|i| (i.smooth_scroll_delta.y as f64, i.zoom_delta() as f64));
    let mut factor = pinch * (scroll * SCROLL_ZOOM_SPEED).exp();
    if response.double_clicked() {
        factor *= 2.0;
    }
    if (factor - 1.0).abs() > f64::EPSILON {
        map.zoom.zoom_about(fit.to_canvas(to_coord(hover)), factor);
    }
}

/// Legend in the bottom-left corner of the map
fn show_legend(ctx: &egui::Context, map_rect: egui::Rect) {
    egui::Area::new(egui::Id::new("map_legend"))
        .fixed_pos(map_rect.left_bottom() + egui::vec2(8.0, -8.0))
        .pivot(egui::Align2::LEFT_BOTTOM)
        .order(egui::Order::Foreground)
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                for (label, swatch) in legend_entries() {
                    ui.horizontal(|ui| {
                        let (rect, _) =
                            ui.allocate_exact_size(egui::vec2(14.0, 14.0), Sense::hover());
                        match swatch {
                            Swatch::Area(color) => {
                                ui.painter().rect_filled(rect, 2.0, color);
                            }
                            Swatch::Marker(color) => {
                                ui.painter().circle(
                                    rect.center(),
                                    6.0,
                                    color,
                                    Stroke::new(1.0, rgb(MARKER_STROKE_RGB)),
                                );
                            }
                        }
                        ui.label(egui::RichText::new(label).small());
                    });
                }
            });
        });
}

/// Draw the map into the remaining space of `ui`.
///
/// Returns the canvas fit used this frame, for overlays anchored to the map.
pub fn show(
    ui: &mut Ui,
    map: &mut MapState,
    countries: &CountryLayer,
    racing_countries: &BTreeSet<String>,
    season: &SeasonView<'_>,
    sink: &mut impl SelectionSink,
) -> CanvasFit {
    profiling::scope!("map_view::show");

    let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
    let fit = CanvasFit::new(
        to_coord(rect.min),
        Coord {
            x: rect.width() as f64,
            y: rect.height() as f64,
        },
    );

    handle_navigation(ui, &response, map, &fit);

    let zoom = map.zoom;
    let markers = season.markers(&map.projection, &zoom);
    let pointer_canvas = response
        .hover_pos()
        .map(|pos| zoom.invert(fit.to_canvas(to_coord(pos))));
    let hovered_marker = pointer_canvas.and_then(|p| view::hit_test(&markers, p));

    if response.clicked() {
        let point = response
            .interact_pointer_pos()
            .map(|pos| zoom.invert(fit.to_canvas(to_coord(pos))));
        view::resolve_click(&markers, point, sink);
    }

    if response.dragged() {
        ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
    } else if hovered_marker.is_some() {
        ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
    }

    let to_screen = |p: Coord<f64>| to_pos(fit.to_screen(zoom.apply(p)));
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, SEA);

    // Country layer
    {
        profiling::scope!("countries");
        let mut mesh = egui::Mesh::default();
        let mut borders = Vec::new();
        let border = Stroke::new(0.5, BORDER);

        for shape in &countries.shapes {
            let color = country_fill(season.country_style(&shape.name, racing_countries));
            for triangle in &shape.triangles {
                let base = mesh.vertices.len() as u32;
                for corner in triangle {
                    mesh.colored_vertex(to_screen(*corner), color);
                }
                mesh.add_triangle(base, base + 1, base + 2);
            }
            for outline in &shape.outlines {
                borders.push(Shape::closed_line(
                    outline.iter().map(|c| to_screen(*c)).collect(),
                    border,
                ));
            }
        }
        painter.add(Shape::mesh(mesh));
        painter.extend(borders);
    }

    // Race markers, in round order so later rounds sit on top
    {
        profiling::scope!("markers");
        let px = (zoom.k * fit.scale) as f32;
        for marker in &markers {
            painter.circle(
                to_screen(marker.center),
                marker.radius as f32 * px,
                rgb(marker.fill.rgb()),
                Stroke::new(marker.stroke_width as f32 * px, rgb(MARKER_STROKE_RGB)),
            );
        }
    }

    // Hover label for the country under the pointer
    if hovered_marker.is_none()
        && !response.dragged()
        && let (Some(pos), Some(canvas)) = (response.hover_pos(), pointer_canvas)
    {
        let (lng, lat) = map.projection.invert(canvas);
        if let Some(country) = countries.country_at(lng, lat)
            && !country.name.is_empty()
        {
            painter.text(
                pos + egui::vec2(12.0, -12.0),
                egui::Align2::LEFT_BOTTOM,
                &country.name,
                egui::FontId::proportional(12.0),
                Color32::from_black_alpha(200),
            );
        }
    }

    show_legend(ui.ctx(), rect);

    fit
}
