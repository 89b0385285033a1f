//! # trip-map-directions
//!
//! Fallback route lookups over HTTP for days whose itinerary carries no
//! encoded path.
//!
//! ## Example
//!
//! ```no_run
//! use trip_map_core::{HeadlessCamera, MapsConfig, RouteMap, ViewOptions};
//! use trip_map_directions::HttpMapProvider;
//!
//! # async fn mount() {
//! let map = RouteMap::load(
//!     MapsConfig::from_env(),
//!     &HttpMapProvider::new().with_key_check(true),
//!     Box::new(HeadlessCamera::new(800, 600)),
//!     ViewOptions::default(),
//! )
//! .await;
//! # let _ = map;
//! # }
//! ```

pub mod client;
pub mod provider;
pub mod response;

pub use client::HttpDirections;
pub use provider::{HttpMapProvider, OfflineDirections, OfflineMapProvider};
