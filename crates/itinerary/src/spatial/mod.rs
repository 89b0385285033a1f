//! Geometry for itinerary routes: polyline codec and bounds.

pub mod bounds;
pub mod polyline;

pub use bounds::{centering, Bounds, Centering, DEFAULT_CITY_CENTER};
pub use polyline::DecodeError;
