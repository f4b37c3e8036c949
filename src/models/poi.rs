//! Point of interest model

use serde::{Deserialize, Serialize};

use crate::{Result, TripcraftError};

fn default_category() -> String {
    "monument".to_string()
}

/// A named, geolocated place a traveler may visit
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Poi {
    /// Identifier, unique within one request
    #[serde(default)]
    pub id: u64,
    /// Display name
    pub name: String,
    /// City the place belongs to
    #[serde(default)]
    pub city: String,
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lng: f64,
    /// Category tag (monument, full-day, ...)
    #[serde(rename = "type", default = "default_category")]
    pub category: String,
}

impl Poi {
    /// Create a new point of interest with the default category
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>, city: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id,
            name: name.into(),
            city: city.into(),
            lat,
            lng,
            category: default_category(),
        }
    }

    /// Coordinates as a `(lat, lng)` pair
    #[must_use]
    pub fn coordinates(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    /// Reject non-finite or out-of-range coordinates
    pub fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || !self.lng.is_finite() {
            return Err(TripcraftError::validation(format!(
                "'{}' has non-numeric coordinates ({}, {})",
                self.name, self.lat, self.lng
            )));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(TripcraftError::validation(format!(
                "'{}' has latitude {} outside [-90, 90]",
                self.name, self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(TripcraftError::validation(format!(
                "'{}' has longitude {} outside [-180, 180]",
                self.name, self.lng
            )));
        }
        Ok(())
    }
}

/// Validate every POI in a list
pub fn validate_all(pois: &[Poi]) -> Result<()> {
    pois.iter().try_for_each(Poi::validate)
}
