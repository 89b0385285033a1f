//! Bounding rectangles and centering for sets of stops.
//!
//! Used twice by the map: once over every stop of the itinerary for the
//! initial view, once over a single day's stops when that day gets focus.

use geo::{BoundingRect, Coord, MultiPoint, Point, Rect};

use crate::models::types::Stop;

/// Center used when there is nothing to frame (Gangtok, Sikkim).
pub const DEFAULT_CITY_CENTER: Point = Point(Coord {
    x: 88.6065,
    y: 27.3389,
});

/// Axis-aligned latitude/longitude rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    pub fn from_point(point: Point) -> Self {
        Self {
            min_lat: point.y(),
            max_lat: point.y(),
            min_lng: point.x(),
            max_lng: point.x(),
        }
    }

    /// Returns `None` for an empty input.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        let points: MultiPoint = points.into_iter().collect::<Vec<_>>().into();
        points.bounding_rect().map(Self::from)
    }

    pub fn from_stops<'a, I>(stops: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Stop>,
    {
        Self::from_points(stops.into_iter().map(Stop::location))
    }

    pub fn extend(&mut self, point: Point) {
        self.min_lat = self.min_lat.min(point.y());
        self.max_lat = self.max_lat.max(point.y());
        self.min_lng = self.min_lng.min(point.x());
        self.max_lng = self.max_lng.max(point.x());
    }

    pub fn union(mut self, other: &Bounds) -> Self {
        self.min_lat = self.min_lat.min(other.min_lat);
        self.max_lat = self.max_lat.max(other.max_lat);
        self.min_lng = self.min_lng.min(other.min_lng);
        self.max_lng = self.max_lng.max(other.max_lng);
        self
    }

    /// Midpoint of the extremes; `None` if any edge is not finite.
    pub fn center(&self) -> Option<Point> {
        let edges = [self.min_lat, self.max_lat, self.min_lng, self.max_lng];
        if edges.iter().any(|v| !v.is_finite()) {
            return None;
        }

        Some(Point::from(self.to_rect().center()))
    }

    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn lng_span(&self) -> f64 {
        self.max_lng - self.min_lng
    }

    pub fn contains(&self, point: Point) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.y())
            && (self.min_lng..=self.max_lng).contains(&point.x())
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(
            Coord {
                x: self.min_lng,
                y: self.min_lat,
            },
            Coord {
                x: self.max_lng,
                y: self.max_lat,
            },
        )
    }
}

impl From<Rect> for Bounds {
    fn from(rect: Rect) -> Self {
        Self {
            min_lat: rect.min().y,
            max_lat: rect.max().y,
            min_lng: rect.min().x,
            max_lng: rect.max().x,
        }
    }
}

/// Camera target for a set of stops.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Centering {
    /// `None` when there were no stops
    pub bounds: Option<Bounds>,
    pub center: Point,
}

/// Bounds and center for `stops`, or the default city with no rectangle.
pub fn centering<'a, I>(stops: I) -> Centering
where
    I: IntoIterator<Item = &'a Stop>,
{
    let bounds = Bounds::from_stops(stops);
    let center = bounds
        .and_then(|b| b.center())
        .unwrap_or(DEFAULT_CITY_CENTER);

    Centering { bounds, center }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_bounds_of_three_stops() {
        let stops = vec![
            Stop::new(27.0, 88.0, "a"),
            Stop::new(28.0, 89.0, "b"),
            Stop::new(27.5, 88.5, "c"),
        ];

        let result = centering(&stops);
        let bounds = result.bounds.unwrap();
        assert_eq!(bounds.min_lat, 27.0);
        assert_eq!(bounds.max_lat, 28.0);
        assert_eq!(bounds.min_lng, 88.0);
        assert_eq!(bounds.max_lng, 89.0);

        assert_abs_diff_eq!(result.center.y(), 27.5, epsilon = 1e-12);
        assert_abs_diff_eq!(result.center.x(), 88.5, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_falls_back_to_default_city() {
        let result = centering(std::iter::empty());
        assert!(result.bounds.is_none());
        assert_eq!(result.center, DEFAULT_CITY_CENTER);
    }

    #[test]
    fn test_single_stop_is_a_point_rect() {
        let stops = vec![Stop::new(10.0, 20.0, "only")];
        let bounds = Bounds::from_stops(&stops).unwrap();
        assert_eq!(bounds.lat_span(), 0.0);
        assert_eq!(bounds.center(), Some(Point::new(20.0, 10.0)));
    }

    #[test]
    fn test_extend_and_union() {
        let mut a = Bounds::from_point(Point::new(0.0, 0.0));
        a.extend(Point::new(2.0, 1.0));
        let b = Bounds::from_point(Point::new(-1.0, 5.0));

        let u = a.union(&b);
        assert_eq!(u.min_lng, -1.0);
        assert_eq!(u.max_lng, 2.0);
        assert_eq!(u.max_lat, 5.0);
        assert!(u.contains(Point::new(0.5, 0.5)));
    }

    #[test]
    fn test_center_requires_finite_edges() {
        let bounds = Bounds {
            min_lat: f64::NAN,
            max_lat: 1.0,
            min_lng: 0.0,
            max_lng: 1.0,
        };
        assert!(bounds.center().is_none());
    }
}
