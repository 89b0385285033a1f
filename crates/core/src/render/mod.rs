//! Scene composition.
//!
//! Turns the itinerary, resolved paths and active day into plain drawing
//! primitives. The host's map engine draws them; nothing here touches the
//! camera.

use geo::{LineString, Point};
use trip_map_itinerary::{DayNumber, DayRoute, PlaceIdentifier, RouteCollection, RouteSummary};

use crate::resolver::{Provenance, RouteResolver};

pub mod selection;
pub mod style;

pub use selection::{MarkerId, MarkerSelection};
pub use style::{hex, ArrowSymbol, LineStyle, MarkerStyle, RouteTheme};

#[derive(Clone, Debug, PartialEq)]
pub struct RouteOverlay {
    pub day: DayNumber,
    pub path: LineString,
    pub provenance: Provenance,
    pub active: bool,
    pub style: LineStyle,
    pub arrows: ArrowSymbol,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MarkerPopup {
    pub title: String,
    pub day: DayNumber,
    /// Only set on a day's last stop
    pub summary: Option<RouteSummary>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StopMarker {
    pub id: MarkerId,
    pub number: usize,
    pub position: Point,
    pub place_id: Option<PlaceIdentifier>,
    pub emphasized: bool,
    pub style: MarkerStyle,
    pub popup: MarkerPopup,
    pub popup_open: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    pub overlays: Vec<RouteOverlay>,
    pub markers: Vec<StopMarker>,
}

impl Scene {
    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty() && self.markers.is_empty()
    }

    pub fn open_popup(&self) -> Option<&StopMarker> {
        self.markers.iter().find(|m| m.popup_open)
    }

    pub fn markers_for(&self, day: DayNumber) -> impl Iterator<Item = &StopMarker> {
        self.markers.iter().filter(move |m| m.id.day == day)
    }

    pub fn overlay_for(&self, day: DayNumber) -> Option<&RouteOverlay> {
        self.overlays.iter().find(|o| o.day == day)
    }
}

/// Whether `id` addresses a stop in `routes`
pub fn marker_exists(routes: &RouteCollection, id: MarkerId) -> bool {
    routes
        .day(id.day)
        .is_some_and(|route| id.index < route.stops.len())
}

pub fn compose(
    routes: &RouteCollection,
    resolver: &RouteResolver,
    active_day: Option<DayNumber>,
    selection: &MarkerSelection,
    theme: &RouteTheme,
) -> Scene {
    let mut scene = Scene::default();

    for route in routes {
        let active = active_day == Some(route.day);

        if let Some(resolved) = resolver.path(route.day).filter(|r| r.is_drawable()) {
            scene.overlays.push(RouteOverlay {
                day: route.day,
                path: resolved.path.clone(),
                provenance: resolved.provenance,
                active,
                style: theme.line(active),
                arrows: theme.arrows(active),
            });
        }

        let fetched_summary = resolver.path(route.day).and_then(|r| r.summary);
        push_markers(&mut scene, route, active, fetched_summary, selection, theme);
    }

    scene
}

fn push_markers(
    scene: &mut Scene,
    route: &DayRoute,
    active: bool,
    fetched_summary: Option<RouteSummary>,
    selection: &MarkerSelection,
    theme: &RouteTheme,
) {
    let last = route.stops.len().saturating_sub(1);
    let summary = route.summary().or(fetched_summary);

    for (index, stop) in route.stops.iter().enumerate() {
        let id = MarkerId::new(route.day, index);

        scene.markers.push(StopMarker {
            id,
            number: id.number(),
            position: stop.location(),
            place_id: stop.place_id.clone(),
            emphasized: active,
            style: theme.marker(active),
            popup: MarkerPopup {
                title: stop.label.clone(),
                day: route.day,
                summary: if index == last { summary } else { None },
            },
            popup_open: selection.is_open(id),
        });
    }
}
