//! Map providers that hand a loaded directions capability to the route map.
//!
//! [`HttpMapProvider`] builds [`HttpDirections`] and can check the key with
//! one throwaway lookup before the map mounts. [`OfflineMapProvider`] never
//! touches the network.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{info, warn};
use trip_map_core::{LoadResult, MapProvider, MapsConfig, ProviderLoadError};
use trip_map_itinerary::{
    DirectionsRequest, DirectionsService, LookupError, LookupResult, DEFAULT_CITY_CENTER,
};

use crate::client::HttpDirections;

/// Loads [`HttpDirections`] from a [`MapsConfig`].
///
/// With the key check enabled, loading issues one trivial lookup so a
/// rejected key is reported up front instead of on the first itinerary day.
#[derive(Debug, Clone, Default)]
pub struct HttpMapProvider {
    check_key: bool,
}

impl HttpMapProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key_check(mut self, check_key: bool) -> Self {
        self.check_key = check_key;
        self
    }

    async fn load_directions(&self, config: &MapsConfig) -> LoadResult {
        let directions = HttpDirections::new(config)
            .map_err(|e| ProviderLoadError::Load(format!("building HTTP client: {e}")))?;

        if self.check_key {
            verify_key(&directions).await?;
        }

        info!(endpoint = %config.directions_endpoint, "directions provider ready");
        Ok(Arc::new(directions) as Arc<dyn DirectionsService>)
    }
}

impl MapProvider for HttpMapProvider {
    fn load<'a>(
        &'a self,
        config: &'a MapsConfig,
    ) -> Pin<Box<dyn Future<Output = LoadResult> + Send + 'a>> {
        Box::pin(self.load_directions(config))
    }
}

async fn verify_key(directions: &HttpDirections) -> Result<(), ProviderLoadError> {
    let request = DirectionsRequest {
        origin: DEFAULT_CITY_CENTER,
        destination: DEFAULT_CITY_CENTER,
        waypoints: Vec::new(),
    };

    key_check_result(directions.route(&request).await)
}

/// The check only needs the provider to answer; not finding a route is fine.
fn key_check_result(result: LookupResult) -> Result<(), ProviderLoadError> {
    match result {
        Ok(_) | Err(LookupError::NoRoute) => Ok(()),
        Err(LookupError::AccessDenied(message)) => {
            warn!(%message, "directions key rejected");
            Err(ProviderLoadError::AccessRestricted(message))
        }
        Err(err) => {
            warn!(error = %err, "directions key check failed");
            Err(ProviderLoadError::Load(err.to_string()))
        }
    }
}

/// Directions that always fail, leaving maps with markers only
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineDirections;

impl DirectionsService for OfflineDirections {
    fn route<'a>(
        &'a self,
        _request: &'a DirectionsRequest,
    ) -> Pin<Box<dyn Future<Output = LookupResult> + Send + 'a>> {
        let result: LookupResult = Err(LookupError::Offline);
        Box::pin(async move { result })
    }
}

/// Provider that always hands out [`OfflineDirections`]
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineMapProvider;

impl MapProvider for OfflineMapProvider {
    fn load<'a>(
        &'a self,
        _config: &'a MapsConfig,
    ) -> Pin<Box<dyn Future<Output = LoadResult> + Send + 'a>> {
        Box::pin(async { Ok(Arc::new(OfflineDirections) as Arc<dyn DirectionsService>) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trip_map_itinerary::{DirectionsRoute, Stop};

    #[test]
    fn test_key_check_maps_denied_to_restricted() {
        assert_eq!(
            key_check_result(Err(LookupError::AccessDenied("API not enabled".into()))),
            Err(ProviderLoadError::AccessRestricted("API not enabled".into()))
        );
    }

    #[test]
    fn test_key_check_other_failures_are_generic() {
        assert!(matches!(
            key_check_result(Err(LookupError::RateLimited)),
            Err(ProviderLoadError::Load(_))
        ));
        assert!(matches!(
            key_check_result(Err(LookupError::Transport("refused".into()))),
            Err(ProviderLoadError::Load(_))
        ));
    }

    #[test]
    fn test_key_check_accepts_answers() {
        assert_eq!(key_check_result(Err(LookupError::NoRoute)), Ok(()));
        let route = DirectionsRoute {
            path: geo::LineString::new(Vec::new()),
            summary: None,
        };
        assert_eq!(key_check_result(Ok(route)), Ok(()));
    }

    #[tokio::test]
    async fn test_offline_directions_fail() {
        let stops = vec![Stop::new(1.0, 2.0, "a"), Stop::new(3.0, 4.0, "b")];
        let request = DirectionsRequest::from_stops(&stops).unwrap();
        assert_eq!(
            OfflineDirections.route(&request).await,
            Err(LookupError::Offline)
        );

        let loaded = OfflineMapProvider.load(&MapsConfig::new("unused")).await;
        assert!(loaded.is_ok());
    }

    #[tokio::test]
    async fn test_unchecked_load_succeeds_without_network() {
        let provider = HttpMapProvider::new();
        assert!(provider.load(&MapsConfig::new("key")).await.is_ok());
    }
}
