//! Camera ownership and focus sequencing.
//!
//! The controller fits the camera to every stop exactly once, then moves it
//! incrementally whenever the host selects a different day. Focus requests
//! are queued latest-wins and never applied before the initial fit.

use geo::Point;
use tracing::{debug, info};
use trip_map_itinerary::{Bounds, DayNumber};

use crate::config::ViewOptions;

mod camera;
mod headless;

pub use camera::MapCamera;
pub use headless::{HeadlessCamera, TILE_SIZE};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportPhase {
    Uninitialized,
    FittedToAll,
    FocusedOnDay(DayNumber),
}

/// Snapshot of the camera as last left by the controller
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
    pub center: Point,
    pub zoom: f64,
    pub active_day: Option<DayNumber>,
}

pub struct ViewportController {
    camera: Box<dyn MapCamera>,
    options: ViewOptions,
    phase: ViewportPhase,
    last_applied: Option<DayNumber>,
    pending: Option<Option<DayNumber>>,
}

impl ViewportController {
    pub fn new(camera: Box<dyn MapCamera>, options: ViewOptions) -> Self {
        Self {
            camera,
            options,
            phase: ViewportPhase::Uninitialized,
            last_applied: None,
            pending: None,
        }
    }

    pub fn phase(&self) -> ViewportPhase {
        self.phase
    }

    pub fn camera(&self) -> &dyn MapCamera {
        self.camera.as_ref()
    }

    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    pub fn state(&self) -> ViewportState {
        ViewportState {
            center: self.camera.center(),
            zoom: self.camera.zoom(),
            active_day: self.last_applied,
        }
    }

    /// Initial framing. Does nothing once the camera has been fitted.
    ///
    /// `union` is the rectangle over every stop; `None` means there are no
    /// stops and the camera goes to the fallback center instead.
    pub fn fit_all(&mut self, union: Option<&Bounds>) -> bool {
        if self.phase != ViewportPhase::Uninitialized {
            return false;
        }

        match union {
            Some(bounds) => {
                info!(
                    lat_span = bounds.lat_span(),
                    lng_span = bounds.lng_span(),
                    "fitting camera to itinerary"
                );
                self.camera.fit_bounds(bounds, self.options.fit_padding_px);
            }
            None => {
                info!("no stops to frame; centering on fallback city");
                self.camera.set_center(self.options.fallback_center());
                self.camera.set_zoom(self.options.default_zoom);
            }
        }

        self.phase = ViewportPhase::FittedToAll;
        true
    }

    /// Queue a focus change; only the latest queued value is applied.
    pub fn request_focus(&mut self, day: Option<DayNumber>) {
        self.pending = Some(day);
    }

    /// Apply the queued focus, if any. Returns whether the camera moved.
    ///
    /// Waits (keeping the request queued) until [`fit_all`] has run.
    ///
    /// [`fit_all`]: ViewportController::fit_all
    pub fn apply_pending<F>(&mut self, bounds_for: F) -> bool
    where
        F: Fn(DayNumber) -> Option<Bounds>,
    {
        if self.phase == ViewportPhase::Uninitialized {
            return false;
        }

        match self.pending.take() {
            None => false,
            Some(None) => {
                self.last_applied = None;
                false
            }
            Some(Some(day)) => self.focus(day, bounds_for(day)),
        }
    }

    fn focus(&mut self, day: DayNumber, bounds: Option<Bounds>) -> bool {
        if self.last_applied == Some(day) {
            debug!(%day, "day already focused");
            return false;
        }

        let Some(bounds) = bounds else {
            debug!(%day, "day has no stops; keeping camera");
            return false;
        };

        match bounds.center() {
            Some(center) => {
                self.camera.pan_to(center);

                let zoom = self.camera.zoom();
                let ceiling = self.options.focus_zoom_ceiling;
                if zoom > ceiling {
                    self.camera.set_zoom(ceiling);
                }
                debug!(%day, zoom = zoom.min(ceiling), "panned to day");
            }
            None => {
                debug!(%day, "no usable center; fitting day bounds");
                self.camera
                    .fit_bounds(&bounds, self.options.focus_fallback_padding_px);
            }
        }

        self.last_applied = Some(day);
        self.phase = ViewportPhase::FocusedOnDay(day);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{day, CameraOp, RecordingCamera};

    fn bounds(min_lat: f64, max_lat: f64, min_lng: f64, max_lng: f64) -> Bounds {
        Bounds {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        }
    }

    fn controller(camera: &RecordingCamera) -> ViewportController {
        ViewportController::new(Box::new(camera.clone()), ViewOptions::default())
    }

    #[test]
    fn test_initial_fit_happens_once() {
        let camera = RecordingCamera::new(9.0);
        let mut viewport = controller(&camera);
        let all = bounds(27.0, 28.0, 88.0, 89.0);

        assert!(viewport.fit_all(Some(&all)));
        assert!(!viewport.fit_all(Some(&all)));

        assert_eq!(camera.ops(), vec![CameraOp::FitBounds(all, 50)]);
        assert_eq!(viewport.phase(), ViewportPhase::FittedToAll);
    }

    #[test]
    fn test_empty_itinerary_centers_on_fallback() {
        let camera = RecordingCamera::new(9.0);
        let mut viewport = controller(&camera);

        viewport.fit_all(None);

        let options = ViewOptions::default();
        assert_eq!(
            camera.ops(),
            vec![
                CameraOp::SetCenter(options.fallback_center()),
                CameraOp::SetZoom(options.default_zoom),
            ]
        );
    }

    #[test]
    fn test_focus_waits_for_initial_fit() {
        let camera = RecordingCamera::new(9.0);
        let mut viewport = controller(&camera);
        let day_one = bounds(1.0, 2.0, 1.0, 2.0);

        viewport.request_focus(Some(day(1)));
        assert!(!viewport.apply_pending(|_| Some(day_one)));
        assert_eq!(camera.moves(), 0);

        viewport.fit_all(Some(&day_one));
        assert!(viewport.apply_pending(|_| Some(day_one)));
        assert_eq!(viewport.phase(), ViewportPhase::FocusedOnDay(day(1)));
    }

    #[test]
    fn test_same_day_twice_does_not_move() {
        let camera = RecordingCamera::new(9.0);
        let mut viewport = controller(&camera);
        viewport.fit_all(Some(&bounds(0.0, 10.0, 0.0, 10.0)));
        let day_two = bounds(2.0, 3.0, 2.0, 3.0);

        viewport.request_focus(Some(day(2)));
        assert!(viewport.apply_pending(|_| Some(day_two)));
        let moves = camera.moves();

        viewport.request_focus(Some(day(2)));
        assert!(!viewport.apply_pending(|_| Some(day_two)));
        assert_eq!(camera.moves(), moves);
    }

    #[test]
    fn test_clearing_focus_allows_refocus() {
        let camera = RecordingCamera::new(9.0);
        let mut viewport = controller(&camera);
        viewport.fit_all(Some(&bounds(0.0, 10.0, 0.0, 10.0)));
        let b = bounds(2.0, 3.0, 2.0, 3.0);

        viewport.request_focus(Some(day(2)));
        viewport.apply_pending(|_| Some(b));
        viewport.request_focus(None);
        viewport.apply_pending(|_| Some(b));
        viewport.request_focus(Some(day(2)));
        assert!(viewport.apply_pending(|_| Some(b)));
    }

    #[test]
    fn test_focus_pans_and_caps_zoom() {
        // fit lands closer than the ceiling
        let camera = RecordingCamera::new(15.0);
        let mut viewport = controller(&camera);
        viewport.fit_all(Some(&bounds(0.0, 0.01, 0.0, 0.01)));

        viewport.request_focus(Some(day(1)));
        viewport.apply_pending(|_| Some(bounds(27.0, 28.0, 88.0, 89.0)));

        let ops = camera.ops();
        assert_eq!(ops[1], CameraOp::PanTo(Point::new(88.5, 27.5)));
        assert_eq!(ops[2], CameraOp::SetZoom(12.0));
        assert_eq!(viewport.state().zoom, 12.0);
    }

    #[test]
    fn test_focus_keeps_wider_zoom() {
        let camera = RecordingCamera::new(6.0);
        let mut viewport = controller(&camera);
        viewport.fit_all(Some(&bounds(0.0, 20.0, 0.0, 20.0)));

        viewport.request_focus(Some(day(1)));
        viewport.apply_pending(|_| Some(bounds(1.0, 2.0, 1.0, 2.0)));

        assert_eq!(camera.moves(), 2);
        assert_eq!(viewport.state().zoom, 6.0);
        assert_eq!(viewport.state().active_day, Some(day(1)));
    }

    #[test]
    fn test_latest_request_wins() {
        let camera = RecordingCamera::new(6.0);
        let mut viewport = controller(&camera);

        viewport.request_focus(Some(day(1)));
        viewport.request_focus(Some(day(3)));
        viewport.fit_all(Some(&bounds(0.0, 20.0, 0.0, 20.0)));
        viewport.apply_pending(|d| Some(bounds(d.get() as f64, d.get() as f64 + 1.0, 0.0, 1.0)));

        assert_eq!(viewport.phase(), ViewportPhase::FocusedOnDay(day(3)));
        assert_eq!(camera.ops()[1], CameraOp::PanTo(Point::new(0.5, 3.5)));
    }

    #[test]
    fn test_centerless_bounds_fit_with_larger_padding() {
        let camera = RecordingCamera::new(6.0);
        let mut viewport = controller(&camera);
        viewport.fit_all(Some(&bounds(0.0, 20.0, 0.0, 20.0)));
        let broken = bounds(f64::NAN, 1.0, 0.0, 1.0);

        viewport.request_focus(Some(day(1)));
        assert!(viewport.apply_pending(|_| Some(broken)));

        match &camera.ops()[1] {
            CameraOp::FitBounds(_, padding) => assert_eq!(*padding, 100),
            other => panic!("Expected FitBounds, got {:?}", other),
        }
    }

    #[test]
    fn test_day_without_stops_is_ignored() {
        let camera = RecordingCamera::new(6.0);
        let mut viewport = controller(&camera);
        viewport.fit_all(None);
        let moves = camera.moves();

        viewport.request_focus(Some(day(4)));
        assert!(!viewport.apply_pending(|_| None));
        assert_eq!(camera.moves(), moves);
        assert_eq!(viewport.phase(), ViewportPhase::FittedToAll);
    }
}
