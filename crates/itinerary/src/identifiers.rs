//! Type-safe identifiers for itinerary entities.
//!
//! Place identifiers use Arc<str> for cheap cloning; day numbers are plain
//! 1-based integers wrapped so they cannot be confused with stop indices.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::num::NonZeroU32;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

/// External place reference attached to a stop (e.g. a maps place id).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceIdentifier(Arc<str>);

impl PlaceIdentifier {
    pub fn new(s: impl AsRef<str>) -> Self {
        Self(s.as_ref().into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for PlaceIdentifier {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for PlaceIdentifier {}

impl Hash for PlaceIdentifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Display for PlaceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PlaceIdentifier {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for PlaceIdentifier {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// 1-based itinerary day number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DayNumber(NonZeroU32);

impl DayNumber {
    /// Returns `None` for day 0.
    pub fn new(day: u32) -> Option<Self> {
        NonZeroU32::new(day).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for DayNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for DayNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u32::deserialize(deserializer)?;
        DayNumber::new(raw)
            .ok_or_else(|| serde::de::Error::custom("day numbers are 1-based; got 0"))
    }
}
