//! Itinerary data models and types.

pub mod collection;
pub mod types;

// Re-exports for convenience
pub use collection::RouteCollection;
pub use types::{DayRoute, ItineraryError, Result, RouteSummary, Stop};
