//! # trip-map-itinerary
//!
//! Itinerary days, stops and the geometry needed to draw them on a map.
//!
//! ## Features
//!
//! - **Typed model**: days keyed by 1-based [`DayNumber`], ordered stops
//! - **JSON ingest**: tolerant of the field spellings itinerary generators use
//! - **Polyline codec**: decode/encode the compact ASCII path format
//! - **Bounds**: framing rectangles and centers for any set of stops
//! - **Pluggable directions**: implement your own route lookup
//!
//! ## Example
//!
//! ```
//! use trip_map_itinerary::prelude::*;
//!
//! let routes = RouteCollection::from_json(r#"[
//!     {"day": 1, "stops": [
//!         {"lat": 27.0, "lng": 88.0, "name": "Start"},
//!         {"lat": 28.0, "lng": 89.0, "name": "End"}
//!     ]}
//! ]"#).unwrap();
//!
//! let view = centering(routes.all_stops());
//! assert_eq!(view.center.y(), 27.5);
//! ```

pub mod identifiers;
pub mod models;
pub mod network;
pub mod spatial;

// Re-exports for convenience
pub mod prelude {
    pub use crate::identifiers::*;
    pub use crate::models::{collection::*, types::*};
    pub use crate::network::traits::*;
    pub use crate::spatial::{bounds::*, polyline, DecodeError};
}

pub use prelude::*;
