pub mod config;
pub mod provider;
pub mod render;
pub mod resolver;
pub mod route_map;
pub mod viewport;

#[cfg(test)]
mod testing;

// Re-export the itinerary model from the itinerary crate
pub use trip_map_itinerary as itinerary;

pub use config::{ConfigError, MapsConfig, ViewOptions};
pub use provider::{LoadResult, MapProvider, ProviderLoadError};
pub use render::{compose, MarkerId, MarkerSelection, RouteTheme, Scene};
pub use resolver::{LookupOutcome, LookupRequest, Provenance, ResolvedPath, RouteResolver};
pub use route_map::{MapView, RouteMap};
pub use viewport::{HeadlessCamera, MapCamera, ViewportController, ViewportPhase, ViewportState};
