//! Coordinate transforms for the map view
//!
//! Three spaces are involved:
//! - geographic: longitude/latitude in degrees
//! - canvas: a fixed 800x600 logical drawing surface, produced by [`Projection`]
//! - zoomed canvas: canvas after the user's pan/zoom, produced by [`ZoomTransform`]
//!
//! [`CanvasFit`] then maps the logical canvas into whatever screen rectangle the
//! map panel currently occupies.

use geo::Coord;
use std::f64::consts::FRAC_PI_4;

/// Logical canvas width
pub const CANVAS_WIDTH: f64 = 800.0;

/// Logical canvas height
pub const CANVAS_HEIGHT: f64 = 600.0;

/// Maximum latitude representable in Mercator
pub const MAX_LATITUDE: f64 = 85.05112878;

/// Zoom factor bounds
pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 20.0;

/// Mercator projection with a fixed scale and translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Canvas units per radian
    pub scale: f64,
    /// Canvas position of (0°, 0°)
    pub translate: Coord<f64>,
}

/// Pan/zoom applied on top of the projection: `p' = p * k + (x, y)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

/// Uniform fit of the logical canvas into a screen rectangle, centered
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasFit {
    /// Screen pixels per canvas unit
    pub scale: f64,
    /// Screen position of the canvas origin
    pub offset: Coord<f64>,
}

impl Projection {
    /// Mercator with scale 125, centered horizontally and pushed down to a third
    pub fn mercator() -> Self {
        Self {
            scale: 125.0,
            translate: Coord {
                x: CANVAS_WIDTH / 2.0,
                y: CANVAS_HEIGHT / 1.5,
            },
        }
    }

    /// Project (longitude, latitude) in degrees to canvas space
    pub fn project(&self, lng: f64, lat: f64) -> Coord<f64> {
        let lambda = lng.to_radians();
        let phi = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        Coord {
            x: lambda * self.scale + self.translate.x,
            y: -(FRAC_PI_4 + phi / 2.0).tan().ln() * self.scale + self.translate.y,
        }
    }

    /// Canvas space back to (longitude, latitude) in degrees
    pub fn invert(&self, point: Coord<f64>) -> (f64, f64) {
        let lambda = (point.x - self.translate.x) / self.scale;
        let y = (self.translate.y - point.y) / self.scale;
        let phi = 2.0 * y.exp().atan() - std::f64::consts::FRAC_PI_2;
        (lambda.to_degrees(), phi.to_degrees())
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::mercator()
    }
}

impl ZoomTransform {
    /// Radius of a race marker on screen, in canvas units before zoom
    pub const MARKER_RADIUS: f64 = 6.0;

    /// Stroke width of a race marker outline, in canvas units before zoom
    pub const MARKER_STROKE: f64 = 1.0;

    pub fn identity() -> Self {
        Self {
            k: 1.0,
            x: 0.0,
            y: 0.0,
        }
    }

    /// Apply the transform to a canvas point
    pub fn apply(&self, point: Coord<f64>) -> Coord<f64> {
        Coord {
            x: point.x * self.k + self.x,
            y: point.y * self.k + self.y,
        }
    }

    /// Undo the transform
    pub fn invert(&self, point: Coord<f64>) -> Coord<f64> {
        Coord {
            x: (point.x - self.x) / self.k,
            y: (point.y - self.y) / self.k,
        }
    }

    /// Scale by `factor` around `anchor` (in zoomed canvas space), keeping the
    /// anchor fixed. The resulting factor is clamped to [`MIN_ZOOM`, `MAX_ZOOM`].
    pub fn zoom_about(&mut self, anchor: Coord<f64>, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let k = (self.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let fixed = self.invert(anchor);
        self.k = k;
        self.x = anchor.x - fixed.x * k;
        self.y = anchor.y - fixed.y * k;
    }

    /// Pan by a delta in zoomed canvas units
    pub fn translate_by(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Marker radius in canvas units, so that it looks constant after zoom
    pub fn marker_radius(&self) -> f64 {
        Self::MARKER_RADIUS / self.k
    }

    /// Marker stroke width in canvas units, so that it looks constant after zoom
    pub fn marker_stroke_width(&self) -> f64 {
        Self::MARKER_STROKE / self.k
    }
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl CanvasFit {
    /// Fit the logical canvas into a screen rectangle given by its corner and size
    pub fn new(min: Coord<f64>, size: Coord<f64>) -> Self {
        let scale = (size.x / CANVAS_WIDTH).min(size.y / CANVAS_HEIGHT).max(f64::EPSILON);
        Self {
            scale,
            offset: Coord {
                x: min.x + (size.x - CANVAS_WIDTH * scale) / 2.0,
                y: min.y + (size.y - CANVAS_HEIGHT * scale) / 2.0,
            },
        }
    }

    pub fn to_screen(&self, point: Coord<f64>) -> Coord<f64> {
        Coord {
            x: point.x * self.scale + self.offset.x,
            y: point.y * self.scale + self.offset.y,
        }
    }

    pub fn to_canvas(&self, point: Coord<f64>) -> Coord<f64> {
        Coord {
            x: (point.x - self.offset.x) / self.scale,
            y: (point.y - self.offset.y) / self.scale,
        }
    }
}
