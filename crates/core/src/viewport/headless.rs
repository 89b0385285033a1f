//! Camera that runs without a map engine.
//!
//! Tracks center and zoom the way a Web Mercator tile map would, so the
//! viewport logic can drive it from tools and tests.

use std::f64::consts::PI;

use geo::Point;
use trip_map_itinerary::{Bounds, DEFAULT_CITY_CENTER};

use super::camera::MapCamera;

/// Tile size in pixels (standard web map tile)
pub const TILE_SIZE: f64 = 256.0;

/// Latitude limit of the Web Mercator projection
const MAX_MERCATOR_LAT: f64 = 85.051_128_78;

#[derive(Clone, Debug, PartialEq)]
pub struct HeadlessCamera {
    center: Point,
    zoom: f64,
    width_px: u32,
    height_px: u32,
    min_zoom: f64,
    max_zoom: f64,
}

impl HeadlessCamera {
    pub fn new(width_px: u32, height_px: u32) -> Self {
        Self {
            center: DEFAULT_CITY_CENTER,
            zoom: 0.0,
            width_px,
            height_px,
            min_zoom: 0.0,
            max_zoom: 21.0,
        }
    }

    pub fn with_zoom_range(mut self, min_zoom: f64, max_zoom: f64) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom.max(min_zoom);
        self.zoom = self.zoom.clamp(self.min_zoom, self.max_zoom);
        self
    }

    pub fn viewport(&self) -> (u32, u32) {
        (self.width_px, self.height_px)
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        if zoom.is_finite() {
            zoom.clamp(self.min_zoom, self.max_zoom)
        } else {
            self.max_zoom
        }
    }
}

impl MapCamera for HeadlessCamera {
    fn center(&self) -> Point {
        self.center
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn set_center(&mut self, center: Point) {
        self.center = center;
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.zoom = self.clamp_zoom(zoom);
    }

    fn pan_to(&mut self, center: Point) {
        self.center = center;
    }

    fn fit_bounds(&mut self, bounds: &Bounds, padding_px: u32) {
        let both_sides = padding_px.saturating_mul(2);
        let usable_w = self.width_px.saturating_sub(both_sides).max(1) as f64;
        let usable_h = self.height_px.saturating_sub(both_sides).max(1) as f64;

        let top = mercator_y(bounds.max_lat);
        let bottom = mercator_y(bounds.min_lat);

        let x_fraction = bounds.lng_span() / 360.0;
        let y_fraction = (top - bottom) / (2.0 * PI);

        let zoom = zoom_to_fit(usable_w, x_fraction).min(zoom_to_fit(usable_h, y_fraction));
        self.zoom = self.clamp_zoom(zoom.floor());

        let lng = (bounds.min_lng + bounds.max_lng) / 2.0;
        let lat = inverse_mercator_y((top + bottom) / 2.0);
        self.center = Point::new(lng, lat);
    }
}

/// Largest zoom at which `fraction` of the world fits in `pixels`
fn zoom_to_fit(pixels: f64, fraction: f64) -> f64 {
    if fraction <= 0.0 {
        return f64::INFINITY;
    }
    (pixels / (TILE_SIZE * fraction)).log2()
}

fn mercator_y(lat_deg: f64) -> f64 {
    let lat = lat_deg.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    (PI / 4.0 + lat / 2.0).tan().ln()
}

fn inverse_mercator_y(y: f64) -> f64 {
    y.sinh().atan().to_degrees()
}
