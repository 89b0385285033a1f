//! Per-day route resolution.
//!
//! Each day with at least two stops gets one [`ResolvedPath`]. A usable
//! encoded polyline wins; otherwise the day gets exactly one directions
//! lookup. Results are cached per day for as long as the collection
//! fingerprint stays the same.
//!
//! Resolution is split in two phases so the "one lookup per day" rule is
//! visible in the types:
//!
//! 1. [`RouteResolver::sync`] runs synchronously, decodes what it can and
//!    marks every day that needs a lookup as in flight, returning one
//!    [`LookupRequest`] per such day. Calling it again while a day is in
//!    flight returns nothing for that day. A request dropped before its
//!    outcome is applied releases the day, so the next sync issues it again.
//! 2. [`RouteResolver::complete`] applies a finished lookup. Outcomes from an
//!    older generation (collection changed, or the map was torn down) are
//!    discarded.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Weak};

use futures_util::future::join_all;
use geo::LineString;
use tracing::{debug, warn};
use trip_map_itinerary::{
    polyline, DayNumber, DayRoute, DirectionsRequest, DirectionsService, LookupError,
    LookupResult, RouteCollection, RouteSummary,
};

/// Where a resolved path came from
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum Provenance {
    DecodedPolyline,
    FallbackLookup,
    Unavailable,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedPath {
    pub day: DayNumber,
    pub path: LineString,
    pub provenance: Provenance,
    /// Travel summary reported by the directions provider
    pub summary: Option<RouteSummary>,
    pub failure: Option<LookupError>,
}

impl ResolvedPath {
    fn unavailable(day: DayNumber, failure: LookupError) -> Self {
        Self {
            day,
            path: LineString::new(Vec::new()),
            provenance: Provenance::Unavailable,
            summary: None,
            failure: Some(failure),
        }
    }

    pub fn is_drawable(&self) -> bool {
        self.provenance != Provenance::Unavailable && self.path.0.len() >= 2
    }
}

/// Held by a request and then its outcome; the day stays in flight while
/// either is alive.
type Ticket = Arc<()>;

#[derive(Clone, Debug)]
enum DayState {
    InFlight { generation: u64, ticket: Weak<()> },
    Ready(ResolvedPath),
}

impl DayState {
    fn is_abandoned(&self) -> bool {
        matches!(self, DayState::InFlight { ticket, .. } if ticket.strong_count() == 0)
    }
}

/// A lookup the resolver has committed to; run it exactly once.
#[derive(Debug)]
pub struct LookupRequest {
    pub day: DayNumber,
    pub request: DirectionsRequest,
    generation: u64,
    ticket: Ticket,
}

impl LookupRequest {
    pub async fn run(self, directions: &dyn DirectionsService) -> LookupOutcome {
        debug!(day = %self.day, waypoints = self.request.waypoints.len(), "requesting directions");
        let result = directions.route(&self.request).await;

        LookupOutcome {
            day: self.day,
            generation: self.generation,
            result,
            _ticket: self.ticket,
        }
    }

    /// Owned variant of [`LookupRequest::run`] for spawning on an executor
    pub fn run_with(
        self,
        directions: Arc<dyn DirectionsService>,
    ) -> impl Future<Output = LookupOutcome> + Send + 'static {
        async move { self.run(directions.as_ref()).await }
    }
}

#[derive(Debug)]
pub struct LookupOutcome {
    pub day: DayNumber,
    pub result: LookupResult,
    generation: u64,
    _ticket: Ticket,
}

#[derive(Debug, Default)]
pub struct RouteResolver {
    fingerprint: Option<u64>,
    generation: u64,
    days: HashMap<DayNumber, DayState>,
}

impl RouteResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode polylines and commit to lookups for days that still need one.
    pub fn sync(&mut self, routes: &RouteCollection) -> Vec<LookupRequest> {
        if self.fingerprint != Some(routes.fingerprint()) {
            if self.fingerprint.is_some() {
                debug!(generation = self.generation, "itinerary changed; dropping resolved paths");
            }
            self.invalidate();
            self.fingerprint = Some(routes.fingerprint());
        }

        let mut lookups = Vec::new();

        for route in routes {
            if !route.has_route_line() {
                continue;
            }
            match self.days.get(&route.day) {
                Some(state) if state.is_abandoned() => {
                    debug!(day = %route.day, "lookup dropped before completing; reissuing");
                }
                Some(_) => continue,
                None => {}
            }

            if let Some(resolved) = decode_day(route) {
                self.days.insert(route.day, DayState::Ready(resolved));
                continue;
            }

            let Some(request) = DirectionsRequest::from_stops(&route.stops) else {
                continue;
            };

            let ticket = Ticket::default();
            self.days.insert(
                route.day,
                DayState::InFlight {
                    generation: self.generation,
                    ticket: Arc::downgrade(&ticket),
                },
            );
            lookups.push(LookupRequest {
                day: route.day,
                request,
                generation: self.generation,
                ticket,
            });
        }

        lookups
    }

    /// Apply a finished lookup. Returns `false` when the outcome was stale.
    pub fn complete(&mut self, outcome: LookupOutcome) -> bool {
        let current = matches!(
            self.days.get(&outcome.day),
            Some(DayState::InFlight { generation, .. }) if *generation == outcome.generation
        ) && outcome.generation == self.generation;

        if !current {
            debug!(day = %outcome.day, "discarding stale directions result");
            return false;
        }

        let resolved = match outcome.result {
            Ok(route) if route.path.0.len() >= 2 => ResolvedPath {
                day: outcome.day,
                path: route.path,
                provenance: Provenance::FallbackLookup,
                summary: route.summary,
                failure: None,
            },
            Ok(_) => {
                warn!(day = %outcome.day, "directions returned fewer than two points");
                ResolvedPath::unavailable(outcome.day, LookupError::NoRoute)
            }
            Err(err) => {
                warn!(day = %outcome.day, error = %err, "directions lookup failed");
                ResolvedPath::unavailable(outcome.day, err)
            }
        };

        self.days.insert(outcome.day, DayState::Ready(resolved));
        true
    }

    /// Sync, run every new lookup concurrently, then apply the results.
    pub async fn resolve(&mut self, routes: &RouteCollection, directions: &dyn DirectionsService) {
        let lookups = self.sync(routes);
        if lookups.is_empty() {
            return;
        }

        let outcomes = join_all(lookups.into_iter().map(|l| l.run(directions))).await;
        for outcome in outcomes {
            self.complete(outcome);
        }
    }

    /// Forget everything; results of lookups still running will be dropped.
    pub fn teardown(&mut self) {
        self.invalidate();
        self.fingerprint = None;
    }

    pub fn path(&self, day: DayNumber) -> Option<&ResolvedPath> {
        match self.days.get(&day) {
            Some(DayState::Ready(resolved)) => Some(resolved),
            _ => None,
        }
    }

    pub fn is_in_flight(&self, day: DayNumber) -> bool {
        matches!(self.days.get(&day), Some(DayState::InFlight { .. }))
    }

    pub fn in_flight_count(&self) -> usize {
        self.days
            .values()
            .filter(|s| matches!(s, DayState::InFlight { .. }))
            .count()
    }

    /// False once a teardown or itinerary change has superseded the request
    pub fn is_current(&self, lookup: &LookupRequest) -> bool {
        lookup.generation == self.generation
    }

    fn invalidate(&mut self) {
        self.generation += 1;
        self.days.clear();
    }
}

fn decode_day(route: &DayRoute) -> Option<ResolvedPath> {
    let encoded = route.encoded_path()?;

    match polyline::decode(encoded) {
        Ok(path) if path.0.len() >= 2 => Some(ResolvedPath {
            day: route.day,
            path,
            provenance: Provenance::DecodedPolyline,
            summary: None,
            failure: None,
        }),
        Ok(path) => {
            debug!(day = %route.day, points = path.0.len(), "polyline too short to draw");
            None
        }
        Err(err) => {
            warn!(day = %route.day, error = %err, "ignoring malformed polyline");
            None
        }
    }
}
