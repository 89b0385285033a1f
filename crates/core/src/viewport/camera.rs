use geo::Point;
use trip_map_itinerary::Bounds;

/// Camera primitives supplied by the map engine.
///
/// Points use x = longitude, y = latitude. Implementations own any
/// animation; callers only issue the target.
pub trait MapCamera {
    fn center(&self) -> Point;
    fn zoom(&self) -> f64;

    fn set_center(&mut self, center: Point);
    fn set_zoom(&mut self, zoom: f64);

    /// Smoothly move to `center`, keeping the zoom
    fn pan_to(&mut self, center: Point);

    /// Frame `bounds` leaving `padding_px` on every side
    fn fit_bounds(&mut self, bounds: &Bounds, padding_px: u32);
}
