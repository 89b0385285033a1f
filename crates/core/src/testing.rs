//! Fakes shared by the unit tests.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use geo::{LineString, Point};
use trip_map_itinerary::{
    Bounds, DayNumber, DirectionsRequest, DirectionsRoute, DirectionsService, LookupError,
    LookupResult, RouteSummary, Stop,
};

use crate::viewport::MapCamera;

pub fn day(n: u32) -> DayNumber {
    DayNumber::new(n).unwrap()
}

/// Stops from (lat, lng) pairs, labelled by position
pub fn stops(coords: &[(f64, f64)]) -> Vec<Stop> {
    coords
        .iter()
        .enumerate()
        .map(|(i, (lat, lng))| Stop::new(*lat, *lng, format!("Stop {}", i + 1)))
        .collect()
}

/// Straight-line directions that records every request.
#[derive(Default)]
pub struct FakeDirections {
    requests: Mutex<Vec<DirectionsRequest>>,
    fail_from_latitude: Option<f64>,
    deny_all: bool,
    stall_next: AtomicBool,
}

impl FakeDirections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every request whose origin sits at `latitude`
    pub fn failing_from(mut self, latitude: f64) -> Self {
        self.fail_from_latitude = Some(latitude);
        self
    }

    /// Reject every request the way a restricted key is rejected
    pub fn denying(mut self) -> Self {
        self.deny_all = true;
        self
    }

    /// The next request never completes
    pub fn stalling_once(self) -> Self {
        self.stall_next.store(true, Ordering::SeqCst);
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<DirectionsRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl DirectionsService for FakeDirections {
    fn route<'a>(
        &'a self,
        request: &'a DirectionsRequest,
    ) -> Pin<Box<dyn Future<Output = LookupResult> + Send + 'a>> {
        self.requests.lock().unwrap().push(request.clone());
        let fail = self.fail_from_latitude == Some(request.origin.y());
        let deny = self.deny_all;

        if self.stall_next.swap(false, Ordering::SeqCst) {
            return Box::pin(futures_util::future::pending::<LookupResult>());
        }

        Box::pin(async move {
            if deny {
                return Err(LookupError::AccessDenied(
                    "API keys with referer restrictions cannot be used with this API".into(),
                ));
            }
            if fail {
                return Err(LookupError::NoRoute);
            }
            Ok(DirectionsRoute {
                path: LineString::from(request.points().collect::<Vec<_>>()),
                summary: Some(RouteSummary {
                    eta_minutes: Some(30.0),
                    distance_km: Some(12.0),
                }),
            })
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CameraOp {
    SetCenter(Point),
    SetZoom(f64),
    PanTo(Point),
    FitBounds(Bounds, u32),
}

#[derive(Debug)]
struct CameraLog {
    ops: Vec<CameraOp>,
    center: Point,
    zoom: f64,
    fit_zoom: f64,
}

/// Camera that records operations; clones share the same log.
#[derive(Clone, Debug)]
pub struct RecordingCamera {
    log: Arc<Mutex<CameraLog>>,
}

impl RecordingCamera {
    /// `fit_zoom` is the zoom any fit-bounds call lands on
    pub fn new(fit_zoom: f64) -> Self {
        Self {
            log: Arc::new(Mutex::new(CameraLog {
                ops: Vec::new(),
                center: Point::new(0.0, 0.0),
                zoom: 3.0,
                fit_zoom,
            })),
        }
    }

    pub fn ops(&self) -> Vec<CameraOp> {
        self.log.lock().unwrap().ops.clone()
    }

    pub fn moves(&self) -> usize {
        self.log.lock().unwrap().ops.len()
    }
}

impl MapCamera for RecordingCamera {
    fn center(&self) -> Point {
        self.log.lock().unwrap().center
    }

    fn zoom(&self) -> f64 {
        self.log.lock().unwrap().zoom
    }

    fn set_center(&mut self, center: Point) {
        let mut log = self.log.lock().unwrap();
        log.center = center;
        log.ops.push(CameraOp::SetCenter(center));
    }

    fn set_zoom(&mut self, zoom: f64) {
        let mut log = self.log.lock().unwrap();
        log.zoom = zoom;
        log.ops.push(CameraOp::SetZoom(zoom));
    }

    fn pan_to(&mut self, center: Point) {
        let mut log = self.log.lock().unwrap();
        log.center = center;
        log.ops.push(CameraOp::PanTo(center));
    }

    fn fit_bounds(&mut self, bounds: &Bounds, padding_px: u32) {
        let mut log = self.log.lock().unwrap();
        if let Some(center) = bounds.center() {
            log.center = center;
        }
        log.zoom = log.fit_zoom;
        log.ops.push(CameraOp::FitBounds(*bounds, padding_px));
    }
}
