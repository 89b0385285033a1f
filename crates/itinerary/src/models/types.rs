//! Core data types for itinerary days and their stops.

use std::fmt;

use geo::Point;
use serde::{Deserialize, Deserializer, Serialize};

use crate::identifiers::*;

// ============================================================================
// Data Structures
// ============================================================================

/// A single place visited on an itinerary day.
///
/// Stops are immutable once produced by the itinerary source and are
/// identified by their index within the owning day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lng", alias = "lon")]
    pub longitude: f64,
    #[serde(alias = "name", default)]
    pub label: String,
    #[serde(alias = "placeId", default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<PlaceIdentifier>,
}

impl Stop {
    pub fn new(latitude: f64, longitude: f64, label: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            label: label.into(),
            place_id: None,
        }
    }

    pub fn with_place_id(mut self, place_id: impl Into<PlaceIdentifier>) -> Self {
        self.place_id = Some(place_id.into());
        self
    }

    /// Location as a geo point (x = longitude, y = latitude)
    pub fn location(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }

    fn has_valid_coordinates(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Precomputed travel summary for a day (shown on the last stop's popup).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub eta_minutes: Option<f64>,
    pub distance_km: Option<f64>,
}

impl RouteSummary {
    pub fn is_empty(&self) -> bool {
        self.eta_minutes.is_none() && self.distance_km.is_none()
    }
}

impl fmt::Display for RouteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(2);

        if let Some(minutes) = self.eta_minutes {
            let minutes = minutes.max(0.0).round() as u64;
            if minutes >= 60 {
                parts.push(format!("{} h {} min", minutes / 60, minutes % 60));
            } else {
                parts.push(format!("{} min", minutes));
            }
        }
        if let Some(km) = self.distance_km {
            parts.push(format!("{:.1} km", km));
        }

        write!(f, "{}", parts.join(" · "))
    }
}

/// One itinerary day: its ordered stops plus an optional encoded path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DayRoute {
    #[serde(alias = "dayNumber")]
    pub day: DayNumber,
    #[serde(
        alias = "encodedPolyline",
        alias = "encoded_path",
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub polyline: Option<String>,
    #[serde(default)]
    pub stops: Vec<Stop>,
    #[serde(alias = "etaMinutes", default, skip_serializing_if = "Option::is_none")]
    pub eta_minutes: Option<f64>,
    #[serde(alias = "distanceKm", default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl DayRoute {
    pub fn new(day: DayNumber, stops: Vec<Stop>) -> Self {
        Self {
            day,
            polyline: None,
            stops,
            eta_minutes: None,
            distance_km: None,
        }
    }

    pub fn with_polyline(mut self, encoded: impl Into<String>) -> Self {
        let encoded = encoded.into();
        self.polyline = (!encoded.is_empty()).then_some(encoded);
        self
    }

    pub fn with_summary(mut self, eta_minutes: Option<f64>, distance_km: Option<f64>) -> Self {
        self.eta_minutes = eta_minutes;
        self.distance_km = distance_km;
        self
    }

    /// Encoded path string, ignoring empty strings
    pub fn encoded_path(&self) -> Option<&str> {
        self.polyline.as_deref().filter(|p| !p.is_empty())
    }

    /// Precomputed ETA / distance, if the itinerary source supplied any
    pub fn summary(&self) -> Option<RouteSummary> {
        let summary = RouteSummary {
            eta_minutes: self.eta_minutes,
            distance_km: self.distance_km,
        };
        (!summary.is_empty()).then_some(summary)
    }

    /// Markers need at least one stop
    pub fn is_renderable(&self) -> bool {
        !self.stops.is_empty()
    }

    /// Route lines need at least two stops
    pub fn has_route_line(&self) -> bool {
        self.stops.len() >= 2
    }

    pub(crate) fn validate(&self) -> Result<()> {
        for (index, stop) in self.stops.iter().enumerate() {
            if !stop.has_valid_coordinates() {
                return Err(ItineraryError::InvalidCoordinate {
                    day: self.day,
                    index,
                    latitude: stop.latitude,
                    longitude: stop.longitude,
                });
            }
        }
        Ok(())
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ItineraryError {
    #[error("Day {0} appears more than once")]
    DuplicateDay(DayNumber),

    #[error("Day {day}, stop {index}: invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate {
        day: DayNumber,
        index: usize,
        latitude: f64,
        longitude: f64,
    },

    #[error("Malformed itinerary JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ItineraryError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn day(n: u32) -> DayNumber {
        DayNumber::new(n).unwrap()
    }

    #[test]
    fn test_stop_location_axes() {
        let stop = Stop::new(27.33, 88.61, "Gangtok");
        let point = stop.location();
        assert_eq!(point.x(), 88.61);
        assert_eq!(point.y(), 27.33);
    }

    #[test]
    fn test_empty_polyline_is_absent() {
        let route = DayRoute::new(day(1), vec![]).with_polyline("");
        assert_eq!(route.encoded_path(), None);

        let route: DayRoute =
            serde_json::from_str(r#"{"day": 1, "polyline": "", "stops": []}"#).unwrap();
        assert_eq!(route.polyline, None);
    }

    #[test]
    fn test_summary_only_when_present() {
        let route = DayRoute::new(day(1), vec![]);
        assert!(route.summary().is_none());

        let route = route.with_summary(Some(135.0), None);
        let summary = route.summary().unwrap();
        assert_eq!(summary.to_string(), "2 h 15 min");

        let both = RouteSummary {
            eta_minutes: Some(45.0),
            distance_km: Some(12.34),
        };
        assert_eq!(both.to_string(), "45 min · 12.3 km");
    }

    #[test]
    fn test_stop_aliases() {
        let stop: Stop = serde_json::from_str(
            r#"{"lat": 27.5, "lng": 88.5, "name": "Rumtek", "placeId": "abc"}"#,
        )
        .unwrap();
        assert_eq!(stop.latitude, 27.5);
        assert_eq!(stop.longitude, 88.5);
        assert_eq!(stop.label, "Rumtek");
        assert_eq!(stop.place_id, Some(PlaceIdentifier::new("abc")));
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let route = DayRoute::new(
            day(2),
            vec![Stop::new(27.0, 88.0, "ok"), Stop::new(95.0, 0.0, "bad")],
        );
        match route.validate() {
            Err(ItineraryError::InvalidCoordinate { index, .. }) => assert_eq!(index, 1),
            other => panic!("Expected InvalidCoordinate, got {:?}", other),
        }

        let route = DayRoute::new(day(2), vec![Stop::new(f64::NAN, 0.0, "nan")]);
        assert!(route.validate().is_err());
    }

    #[test]
    fn test_line_and_marker_thresholds() {
        let one = DayRoute::new(day(1), vec![Stop::new(1.0, 1.0, "a")]);
        assert!(one.is_renderable());
        assert!(!one.has_route_line());

        let none = DayRoute::new(day(2), vec![]);
        assert!(!none.is_renderable());
    }
}
