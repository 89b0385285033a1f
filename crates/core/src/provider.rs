//! Map provider loading.
//!
//! A provider turns a [`MapsConfig`] into the capabilities the map needs at
//! runtime. Loading can fail in two ways that need different fixes, so the
//! error keeps them apart.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use trip_map_itinerary::DirectionsService;

use crate::config::MapsConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderLoadError {
    /// Credential rejected for this origin, or the API is not enabled
    #[error("map provider access restricted: {0}")]
    AccessRestricted(String),

    #[error("map provider failed to load: {0}")]
    Load(String),
}

impl ProviderLoadError {
    /// Static text shown in place of the map
    pub fn user_message(&self) -> &'static str {
        match self {
            ProviderLoadError::AccessRestricted(_) => {
                "Map access is restricted. Check that the API key allows this site and \
                 that the directions API is enabled, then reload."
            }
            ProviderLoadError::Load(_) => {
                "The map could not be loaded. Check your connection and reload the page."
            }
        }
    }
}

pub type LoadResult = Result<Arc<dyn DirectionsService>, ProviderLoadError>;

/// Loads the directions capability for a configured provider
pub trait MapProvider: Send + Sync {
    fn load<'a>(
        &'a self,
        config: &'a MapsConfig,
    ) -> Pin<Box<dyn Future<Output = LoadResult> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_differ_by_remedy() {
        let restricted = ProviderLoadError::AccessRestricted("RefererNotAllowed".into());
        let generic = ProviderLoadError::Load("timeout".into());
        assert_ne!(restricted.user_message(), generic.user_message());
        assert!(restricted.to_string().contains("RefererNotAllowed"));
    }
}
