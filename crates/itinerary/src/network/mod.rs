//! Network abstractions.

pub mod traits;

pub use traits::{DirectionsRequest, DirectionsRoute, DirectionsService, LookupError};
