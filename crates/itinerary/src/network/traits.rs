//! Pluggable directions lookup.
//!
//! External crates implement [`DirectionsService`] to compute a driving path
//! through an ordered list of waypoints.

use std::future::Future;
use std::pin::Pin;

use geo::{LineString, Point};

use crate::models::types::{RouteSummary, Stop};

/// Ordered waypoints for one lookup. Intermediate stops keep their order;
/// providers must not optimise it.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectionsRequest {
    pub origin: Point,
    pub destination: Point,
    pub waypoints: Vec<Point>,
}

impl DirectionsRequest {
    /// First stop is the origin, last the destination. Needs two stops.
    pub fn from_stops(stops: &[Stop]) -> Option<Self> {
        let (first, rest) = stops.split_first()?;
        let (last, middle) = rest.split_last()?;

        Some(Self {
            origin: first.location(),
            destination: last.location(),
            waypoints: middle.iter().map(Stop::location).collect(),
        })
    }

    /// Origin, waypoints and destination in travel order
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        std::iter::once(self.origin)
            .chain(self.waypoints.iter().copied())
            .chain(std::iter::once(self.destination))
    }
}

/// Successful lookup result
#[derive(Clone, Debug, PartialEq)]
pub struct DirectionsRoute {
    pub path: LineString,
    pub summary: Option<RouteSummary>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LookupError {
    #[error("no route found between the requested waypoints")]
    NoRoute,

    #[error("directions request denied: {0}")]
    AccessDenied(String),

    #[error("directions quota exceeded")]
    RateLimited,

    #[error("directions provider returned {status}: {message}")]
    Provider { status: String, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed directions response: {0}")]
    Malformed(String),

    #[error("directions lookups are disabled")]
    Offline,
}

pub type LookupResult = std::result::Result<DirectionsRoute, LookupError>;

/// Compute a route through ordered waypoints
pub trait DirectionsService: Send + Sync {
    fn route<'a>(
        &'a self,
        request: &'a DirectionsRequest,
    ) -> Pin<Box<dyn Future<Output = LookupResult> + Send + 'a>>;
}
