//! Ordered collection of itinerary days with a content fingerprint.
//!
//! The fingerprint stands in for "identity" of the collection: caches keyed
//! on a collection stay valid exactly as long as its fingerprint is unchanged.

use std::collections::HashMap;
use std::hash::Hasher;

use serde::Deserialize;
use twox_hash::XxHash64;

use crate::identifiers::DayNumber;
use crate::models::types::*;

#[derive(Clone, Debug, PartialEq)]
pub struct RouteCollection {
    days: Vec<DayRoute>,
    index: HashMap<DayNumber, usize>,
    fingerprint: u64,
}

#[derive(Deserialize)]
struct Wrapped {
    days: Vec<DayRoute>,
}

impl RouteCollection {
    /// Build a collection, rejecting duplicate days and invalid coordinates.
    ///
    /// Day numbers need not be contiguous; iteration keeps the given order.
    pub fn new(days: Vec<DayRoute>) -> Result<Self> {
        let mut index = HashMap::with_capacity(days.len());
        for (position, route) in days.iter().enumerate() {
            route.validate()?;
            if index.insert(route.day, position).is_some() {
                return Err(ItineraryError::DuplicateDay(route.day));
            }
        }

        let fingerprint = fingerprint(&days);
        Ok(Self {
            days,
            index,
            fingerprint,
        })
    }

    pub fn empty() -> Self {
        Self {
            days: Vec::new(),
            index: HashMap::new(),
            fingerprint: fingerprint(&[]),
        }
    }

    /// Parse either a bare array of days or an object with a `days` array.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let days = if value.is_array() {
            serde_json::from_value::<Vec<DayRoute>>(value)?
        } else {
            serde_json::from_value::<Wrapped>(value)?.days
        };
        Self::new(days)
    }

    pub fn days(&self) -> &[DayRoute] {
        &self.days
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DayRoute> {
        self.days.iter()
    }

    pub fn day(&self, day: DayNumber) -> Option<&DayRoute> {
        self.index.get(&day).map(|&position| &self.days[position])
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Every stop across all days, in day order
    pub fn all_stops(&self) -> impl Iterator<Item = &Stop> {
        self.days.iter().flat_map(|d| d.stops.iter())
    }

    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }
}

impl Default for RouteCollection {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a> IntoIterator for &'a RouteCollection {
    type Item = &'a DayRoute;
    type IntoIter = std::slice::Iter<'a, DayRoute>;

    fn into_iter(self) -> Self::IntoIter {
        self.days.iter()
    }
}

fn fingerprint(days: &[DayRoute]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);

    hasher.write_usize(days.len());
    for route in days {
        hasher.write_u32(route.day.get());
        write_str(&mut hasher, route.encoded_path().unwrap_or(""));
        write_opt_f64(&mut hasher, route.eta_minutes);
        write_opt_f64(&mut hasher, route.distance_km);

        hasher.write_usize(route.stops.len());
        for stop in &route.stops {
            hasher.write_u64(stop.latitude.to_bits());
            hasher.write_u64(stop.longitude.to_bits());
            write_str(&mut hasher, &stop.label);
            write_str(
                &mut hasher,
                stop.place_id.as_ref().map(|p| p.as_str()).unwrap_or(""),
            );
        }
    }

    hasher.finish()
}

fn write_str(hasher: &mut impl Hasher, s: &str) {
    hasher.write_usize(s.len());
    hasher.write(s.as_bytes());
}

fn write_opt_f64(hasher: &mut impl Hasher, value: Option<f64>) {
    match value {
        Some(v) => {
            hasher.write_u8(1);
            hasher.write_u64(v.to_bits());
        }
        None => hasher.write_u8(0),
    }
}
