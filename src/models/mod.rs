//! Data models for the itinerary organizer
//!
//! - Poi: a named, geolocated place
//! - Itinerary: city selections, transition codes, outlier splits and day routes

pub mod itinerary;
pub mod poi;

pub use itinerary::{CitySelection, DayPlan, DayRoute, OutlierSplit, SequencedDay, TransitionCode};
pub use poi::Poi;
