//! HTTP directions lookups.

use std::future::Future;
use std::pin::Pin;

use geo::Point;
use reqwest::Url;
use tracing::debug;
use trip_map_core::MapsConfig;
use trip_map_itinerary::{DirectionsRequest, DirectionsService, LookupError, LookupResult};

use crate::response;

/// Directions over a Google-Directions-compatible JSON endpoint
pub struct HttpDirections {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpDirections {
    pub fn new(config: &MapsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: reqwest::Client, config: &MapsConfig) -> Self {
        Self {
            client,
            endpoint: config.directions_endpoint.clone(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn request_url(&self, request: &DirectionsRequest) -> Result<Url, LookupError> {
        let mut params = vec![
            ("origin", lat_lng(request.origin)),
            ("destination", lat_lng(request.destination)),
        ];

        if !request.waypoints.is_empty() {
            let waypoints: Vec<String> = request.waypoints.iter().copied().map(lat_lng).collect();
            params.push(("waypoints", waypoints.join("|")));
        }

        params.push(("mode", "driving".to_string()));
        params.push(("key", self.api_key.clone()));

        Url::parse_with_params(&self.endpoint, &params)
            .map_err(|e| LookupError::Transport(format!("bad directions endpoint: {e}")))
    }

    async fn fetch(&self, request: &DirectionsRequest) -> LookupResult {
        let url = self.request_url(request)?;

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(LookupError::Transport(format!("HTTP error: {}", resp.status())));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        debug!(bytes = body.len(), "directions response received");
        response::parse(&body)
    }
}

impl DirectionsService for HttpDirections {
    fn route<'a>(
        &'a self,
        request: &'a DirectionsRequest,
    ) -> Pin<Box<dyn Future<Output = LookupResult> + Send + 'a>> {
        Box::pin(self.fetch(request))
    }
}

/// `lat,lng` with the codec's precision
fn lat_lng(point: Point) -> String {
    format!("{:.5},{:.5}", point.y(), point.x())
}
