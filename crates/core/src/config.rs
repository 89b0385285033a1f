//! Provider credentials and view tuning.

use std::fmt;
use std::time::Duration;

use geo::Point;
use serde::Deserialize;
use trip_map_itinerary::DEFAULT_CITY_CENTER;

pub const API_KEY_VAR: &str = "MAPS_API_KEY";
pub const DIRECTIONS_ENDPOINT_VAR: &str = "MAPS_DIRECTIONS_ENDPOINT";
pub const REQUEST_TIMEOUT_VAR: &str = "MAPS_REQUEST_TIMEOUT_SECS";

pub const DEFAULT_DIRECTIONS_ENDPOINT: &str =
    "https://maps.googleapis.com/maps/api/directions/json";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not set")]
    MissingCredential { var: &'static str },

    #[error("{var} has invalid value {value:?}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl ConfigError {
    /// Static text shown in place of the map
    pub fn user_message(&self) -> String {
        match self {
            ConfigError::MissingCredential { var } => {
                format!("Map is not configured. Set {var} to enable the route map.")
            }
            ConfigError::InvalidValue { var, .. } => {
                format!("Map is not configured correctly. Check {var}.")
            }
        }
    }
}

/// Credentials and endpoints for the map provider
#[derive(Clone, PartialEq)]
pub struct MapsConfig {
    pub api_key: String,
    pub directions_endpoint: String,
    pub request_timeout: Duration,
}

impl MapsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            directions_endpoint: DEFAULT_DIRECTIONS_ENDPOINT.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`MapsConfig::from_env`] but reading through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingCredential { var: API_KEY_VAR })?;

        let mut config = Self::new(api_key);

        if let Some(endpoint) = lookup(DIRECTIONS_ENDPOINT_VAR).filter(|v| !v.trim().is_empty()) {
            let endpoint = endpoint.trim().to_string();
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    var: DIRECTIONS_ENDPOINT_VAR,
                    value: endpoint,
                    reason: "expected an http(s) URL",
                });
            }
            config.directions_endpoint = endpoint;
        }

        if let Some(raw) = lookup(REQUEST_TIMEOUT_VAR) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or(ConfigError::InvalidValue {
                    var: REQUEST_TIMEOUT_VAR,
                    value: raw.clone(),
                    reason: "expected a positive number of seconds",
                })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

impl fmt::Debug for MapsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapsConfig")
            .field("api_key", &"<redacted>")
            .field("directions_endpoint", &self.directions_endpoint)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Camera constants for fitting and focusing
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    /// Padding around the initial all-days fit
    pub fit_padding_px: u32,
    /// Padding for the per-day fallback fit
    pub focus_fallback_padding_px: u32,
    /// Focus never leaves the camera closer than this
    pub focus_zoom_ceiling: f64,
    /// Zoom used when there is nothing to frame
    pub default_zoom: f64,
    pub fallback_latitude: f64,
    pub fallback_longitude: f64,
}

impl ViewOptions {
    pub fn fallback_center(&self) -> Point {
        Point::new(self.fallback_longitude, self.fallback_latitude)
    }
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            fit_padding_px: 50,
            focus_fallback_padding_px: 100,
            focus_zoom_ceiling: 12.0,
            default_zoom: 10.0,
            fallback_latitude: DEFAULT_CITY_CENTER.y(),
            fallback_longitude: DEFAULT_CITY_CENTER.x(),
        }
    }
}
