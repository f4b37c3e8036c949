//! `Tripcraft` - Geospatial itinerary organizer
//!
//! This library separates outlier points of interest per city, partitions a
//! trip's POIs into capacity-bounded visiting groups, and orders each day's
//! POIs into a short visiting sequence with an optional drawable path.

pub mod api;
pub mod config;
pub mod dedup;
pub mod directions;
pub mod error;
pub mod geo;
pub mod models;
pub mod organizer;
pub mod planner;
pub mod web;

// Re-export core types for public API
pub use config::TripcraftConfig;
pub use dedup::SeenPlaces;
pub use directions::{DirectionsProvider, GoogleDirectionsClient, NoDirections};
pub use error::TripcraftError;
pub use models::{CitySelection, DayPlan, DayRoute, OutlierSplit, Poi, SequencedDay, TransitionCode};
pub use organizer::ItineraryOrganizer;
pub use planner::TripPlanner;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TripcraftError>;
