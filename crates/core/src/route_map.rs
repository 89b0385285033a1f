//! Host-facing route map.
//!
//! [`RouteMap`] owns the resolver cache, the viewport and the popup
//! selection for one mounted map. Each [`RouteMap::render`] call reconciles
//! them against the latest itinerary and active day and returns what the
//! host should display right away, drawing whatever paths are already known.
//!
//! Directions lookups the itinerary still needs are queued by `render` and
//! run by the host: either hand the futures from [`RouteMap::take_lookups`]
//! to an executor and feed each result to [`RouteMap::complete`], or await
//! [`RouteMap::resolve_pending`]. Render again once results have landed.
//! Dropping a lookup before it completes is fine; the next render queues it
//! again.

use std::future::Future;
use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, info, warn};
use trip_map_itinerary::{Bounds, DayNumber, DirectionsService, LookupError, RouteCollection};

use crate::config::{ConfigError, MapsConfig, ViewOptions};
use crate::provider::{MapProvider, ProviderLoadError};
use crate::render::{self, MarkerId, MarkerSelection, RouteTheme, Scene};
use crate::resolver::{LookupOutcome, LookupRequest, RouteResolver};
use crate::viewport::{MapCamera, ViewportController, ViewportState};

/// What the host shows in place of the map
#[derive(Clone, Debug, PartialEq)]
pub enum MapView {
    NotConfigured { message: String },
    Unavailable {
        error: ProviderLoadError,
        message: &'static str,
    },
    Ready(Scene),
}

impl MapView {
    pub fn scene(&self) -> Option<&Scene> {
        match self {
            MapView::Ready(scene) => Some(scene),
            _ => None,
        }
    }
}

struct Session {
    directions: Arc<dyn DirectionsService>,
    resolver: RouteResolver,
    pending: Vec<LookupRequest>,
    viewport: ViewportController,
    selection: MarkerSelection,
    theme: RouteTheme,
}

enum MapState {
    NotConfigured(ConfigError),
    LoadFailed(ProviderLoadError),
    Ready(Box<Session>),
}

pub struct RouteMap {
    state: MapState,
}

impl RouteMap {
    pub fn not_configured(error: ConfigError) -> Self {
        Self {
            state: MapState::NotConfigured(error),
        }
    }

    pub fn load_failed(error: ProviderLoadError) -> Self {
        Self {
            state: MapState::LoadFailed(error),
        }
    }

    /// Map with an already loaded directions capability
    pub fn ready(
        camera: Box<dyn MapCamera>,
        directions: Arc<dyn DirectionsService>,
        options: ViewOptions,
    ) -> Self {
        Self {
            state: MapState::Ready(Box::new(Session {
                directions,
                resolver: RouteResolver::new(),
                pending: Vec::new(),
                viewport: ViewportController::new(camera, options),
                selection: MarkerSelection::default(),
                theme: RouteTheme::default(),
            })),
        }
    }

    /// Resolve configuration and load the provider. Neither failure is retried.
    pub async fn load(
        config: Result<MapsConfig, ConfigError>,
        provider: &dyn MapProvider,
        camera: Box<dyn MapCamera>,
        options: ViewOptions,
    ) -> Self {
        let config = match config {
            Ok(config) => config,
            Err(err) => {
                warn!(error = %err, "route map not configured");
                return Self::not_configured(err);
            }
        };

        match provider.load(&config).await {
            Ok(directions) => {
                info!("map provider loaded");
                Self::ready(camera, directions, options)
            }
            Err(err) => {
                warn!(error = %err, "map provider failed to load");
                Self::load_failed(err)
            }
        }
    }

    pub fn with_theme(mut self, theme: RouteTheme) -> Self {
        if let MapState::Ready(session) = &mut self.state {
            session.theme = theme;
        }
        self
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, MapState::Ready(_))
    }

    /// Reconcile with the latest itinerary and active day.
    ///
    /// Fits the camera on first use, applies the active-day focus, queues
    /// any directions lookups this itinerary still needs and composes the
    /// scene from the paths resolved so far.
    pub fn render(&mut self, routes: &RouteCollection, active_day: Option<DayNumber>) -> MapView {
        let session = match &mut self.state {
            MapState::NotConfigured(err) => {
                return MapView::NotConfigured {
                    message: err.user_message(),
                };
            }
            MapState::LoadFailed(err) => {
                return MapView::Unavailable {
                    error: err.clone(),
                    message: err.user_message(),
                };
            }
            MapState::Ready(session) => session,
        };

        let lookups = session.resolver.sync(routes);
        let resolver = &session.resolver;
        session.pending.retain(|lookup| resolver.is_current(lookup));
        if !lookups.is_empty() {
            debug!(count = lookups.len(), "queued directions lookups");
            session.pending.extend(lookups);
        }

        let union = Bounds::from_stops(routes.all_stops());
        session.viewport.fit_all(union.as_ref());

        session.viewport.request_focus(active_day);
        session.viewport.apply_pending(|day| {
            routes
                .day(day)
                .and_then(|route| Bounds::from_stops(&route.stops))
        });

        session
            .selection
            .retain(|id| render::marker_exists(routes, id));

        MapView::Ready(render::compose(
            routes,
            &session.resolver,
            active_day,
            &session.selection,
            &session.theme,
        ))
    }

    /// Lookups queued by `render`, ready to run on any executor
    pub fn take_lookups(
        &mut self,
    ) -> Vec<impl Future<Output = LookupOutcome> + Send + 'static + use<>> {
        let MapState::Ready(session) = &mut self.state else {
            return Vec::new();
        };

        let directions = &session.directions;
        session
            .pending
            .drain(..)
            .map(|lookup| lookup.run_with(Arc::clone(directions)))
            .collect()
    }

    /// Apply a finished lookup. Returns `false` when the outcome was stale.
    ///
    /// A lookup refused for access reasons means the key cannot serve this
    /// map, so the map becomes unavailable.
    pub fn complete(&mut self, outcome: LookupOutcome) -> bool {
        let MapState::Ready(session) = &mut self.state else {
            return false;
        };

        let denied = match &outcome.result {
            Err(LookupError::AccessDenied(reason)) => Some(reason.clone()),
            _ => None,
        };

        let applied = session.resolver.complete(outcome);
        if let (true, Some(reason)) = (applied, denied) {
            warn!(reason = %reason, "directions access restricted; map unavailable");
            self.state = MapState::LoadFailed(ProviderLoadError::AccessRestricted(reason));
        }
        applied
    }

    /// Run every queued lookup concurrently and apply the results.
    ///
    /// Returns how many results were applied. Safe to drop before it
    /// finishes.
    pub async fn resolve_pending(&mut self) -> usize {
        let lookups = self.take_lookups();
        if lookups.is_empty() {
            return 0;
        }

        let mut applied = 0;
        for outcome in join_all(lookups).await {
            if self.complete(outcome) {
                applied += 1;
            }
        }
        applied
    }

    /// Open a marker's popup. Returns the marker whose popup was closed.
    pub fn select_marker(&mut self, id: MarkerId) -> Option<MarkerId> {
        match &mut self.state {
            MapState::Ready(session) => session.selection.select(id),
            _ => None,
        }
    }

    pub fn close_popup(&mut self) {
        if let MapState::Ready(session) = &mut self.state {
            session.selection.close();
        }
    }

    /// Drop cached paths; lookups still running when this is called are ignored.
    pub fn teardown(&mut self) {
        if let MapState::Ready(session) = &mut self.state {
            session.resolver.teardown();
            session.pending.clear();
            session.selection.close();
        }
    }

    pub fn viewport(&self) -> Option<ViewportState> {
        match &self.state {
            MapState::Ready(session) => Some(session.viewport.state()),
            _ => None,
        }
    }

    pub fn resolver(&self) -> Option<&RouteResolver> {
        match &self.state {
            MapState::Ready(session) => Some(&session.resolver),
            _ => None,
        }
    }
}
