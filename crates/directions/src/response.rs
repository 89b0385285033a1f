//! Directions JSON response and status mapping.

use serde::Deserialize;
use tracing::debug;
use trip_map_itinerary::{polyline, DirectionsRoute, LookupError, LookupResult, RouteSummary};

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub routes: Vec<RouteBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteBody {
    pub overview_polyline: Option<EncodedPolyline>,
    #[serde(default)]
    pub legs: Vec<Leg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EncodedPolyline {
    pub points: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Leg {
    pub distance: Option<Measure>,
    pub duration: Option<Measure>,
}

/// `value` is metres for distances and seconds for durations
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Measure {
    pub value: f64,
}

pub fn parse(body: &[u8]) -> LookupResult {
    let response: DirectionsResponse =
        serde_json::from_slice(body).map_err(|e| LookupError::Malformed(e.to_string()))?;
    interpret(response)
}

pub fn interpret(response: DirectionsResponse) -> LookupResult {
    let message = || response.error_message.clone().unwrap_or_default();

    match response.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" | "NOT_FOUND" => return Err(LookupError::NoRoute),
        "REQUEST_DENIED" => return Err(LookupError::AccessDenied(message())),
        "OVER_QUERY_LIMIT" => return Err(LookupError::RateLimited),
        other => {
            return Err(LookupError::Provider {
                status: other.to_string(),
                message: message(),
            });
        }
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or(LookupError::NoRoute)?;

    let encoded = route
        .overview_polyline
        .ok_or_else(|| LookupError::Malformed("route has no overview polyline".into()))?;
    let path =
        polyline::decode(&encoded.points).map_err(|e| LookupError::Malformed(e.to_string()))?;

    debug!(points = path.0.len(), legs = route.legs.len(), "decoded directions route");

    Ok(DirectionsRoute {
        path,
        summary: summarize(&route.legs),
    })
}

/// Sum legs into minutes and kilometres. A total is dropped if any leg lacks it.
fn summarize(legs: &[Leg]) -> Option<RouteSummary> {
    if legs.is_empty() {
        return None;
    }

    let seconds: Option<f64> = legs.iter().map(|l| l.duration.map(|m| m.value)).sum();
    let metres: Option<f64> = legs.iter().map(|l| l.distance.map(|m| m.value)).sum();

    let summary = RouteSummary {
        eta_minutes: seconds.map(|s| s / 60.0),
        distance_km: metres.map(|m| m / 1000.0),
    };
    (!summary.is_empty()).then_some(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const OK_BODY: &str = r#"{
        "status": "OK",
        "routes": [{
            "overview_polyline": { "points": "_p~iF~ps|U_ulLnnqC_mqNvxq`@" },
            "legs": [
                { "distance": { "value": 12000, "text": "12 km" },
                  "duration": { "value": 1800, "text": "30 mins" } },
                { "distance": { "value": 3500 },
                  "duration": { "value": 600 } }
            ]
        }]
    }"#;

    #[test]
    fn test_ok_response() {
        let route = parse(OK_BODY.as_bytes()).unwrap();
        assert_eq!(route.path.0.len(), 3);
        assert_abs_diff_eq!(route.path.0[0].y, 38.5, epsilon = 1e-5);

        let summary = route.summary.unwrap();
        assert_abs_diff_eq!(summary.eta_minutes.unwrap(), 40.0);
        assert_abs_diff_eq!(summary.distance_km.unwrap(), 15.5);
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            ("ZERO_RESULTS", LookupError::NoRoute),
            ("NOT_FOUND", LookupError::NoRoute),
            ("REQUEST_DENIED", LookupError::AccessDenied("bad key".into())),
            ("OVER_QUERY_LIMIT", LookupError::RateLimited),
            (
                "UNKNOWN_ERROR",
                LookupError::Provider {
                    status: "UNKNOWN_ERROR".into(),
                    message: "bad key".into(),
                },
            ),
        ];

        for (status, expected) in cases {
            let body = format!(r#"{{"status": "{status}", "error_message": "bad key"}}"#);
            assert_eq!(parse(body.as_bytes()), Err(expected), "status {status}");
        }
    }

    #[test]
    fn test_ok_without_routes_is_no_route() {
        assert_eq!(
            parse(br#"{"status": "OK", "routes": []}"#),
            Err(LookupError::NoRoute)
        );
    }

    #[test]
    fn test_bad_polyline_is_malformed() {
        let body = br#"{"status": "OK", "routes": [{"overview_polyline": {"points": "_p~iF~ps|U_"}}]}"#;
        assert!(matches!(parse(body), Err(LookupError::Malformed(_))));
    }

    #[test]
    fn test_not_json_is_malformed() {
        assert!(matches!(
            parse(b"<html>502</html>"),
            Err(LookupError::Malformed(_))
        ));
    }

    #[test]
    fn test_missing_leg_value_drops_that_total() {
        let legs = vec![
            Leg {
                distance: Some(Measure { value: 1000.0 }),
                duration: None,
            },
            Leg {
                distance: Some(Measure { value: 500.0 }),
                duration: Some(Measure { value: 60.0 }),
            },
        ];
        let summary = summarize(&legs).unwrap();
        assert_eq!(summary.eta_minutes, None);
        assert_abs_diff_eq!(summary.distance_km.unwrap(), 1.5);
        assert!(summarize(&[]).is_none());
    }
}
