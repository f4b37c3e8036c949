//! Geospatial itinerary organizer
//!
//! This module provides the algorithmic core of trip planning:
//! - Outlier extraction per city (density clustering with a distance fallback)
//! - Capacity-constrained partitioning of a trip into visiting groups
//! - Exhaustive day route sequencing with fixed endpoints
//!
//! Everything here is pure and synchronous; the planner layers the
//! directions provider on top.

pub mod dbscan;
pub mod kmeans;
pub mod outliers;
pub mod partition;
pub mod sequencer;

use std::collections::BTreeMap;

use tracing::debug;

use crate::Result;
use crate::config::OrganizerConfig;
use crate::models::{CitySelection, OutlierSplit, Poi, SequencedDay, TransitionCode};

pub use dbscan::Dbscan;
pub use kmeans::KMeans;
pub use partition::PartitionSettings;

/// Entry point for the three organizer operations, bound to one configuration
#[derive(Debug, Clone, Default)]
pub struct ItineraryOrganizer {
    config: OrganizerConfig,
}

impl ItineraryOrganizer {
    #[must_use]
    pub fn new(config: OrganizerConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &OrganizerConfig {
        &self.config
    }

    /// Separate up to `quota` outliers from one city's POIs
    pub fn extract_outliers(&self, pois: Vec<Poi>, quota: usize) -> Result<OutlierSplit> {
        let clustering = Dbscan::new(self.config.outlier_radius_km, self.config.outlier_min_samples);
        outliers::extract_outliers(pois, quota, &clustering)
    }

    /// Apply outlier extraction to every city in trip order.
    ///
    /// A city with no selection yields an empty split. A position without a
    /// transition code gets no quota.
    pub fn extract_city_outliers(
        &self,
        selection: &CitySelection,
        ordered_cities: &[String],
        transitions: &[TransitionCode],
    ) -> Result<BTreeMap<String, OutlierSplit>> {
        let mut result = BTreeMap::new();
        for (position, city) in ordered_cities.iter().enumerate() {
            let pois = selection.get(city).cloned().unwrap_or_default();
            let quota = transitions
                .get(position)
                .map_or(0, |code| code.outlier_quota());
            debug!(city = %city, position, quota, pois = pois.len(), "extracting city outliers");
            result.insert(city.clone(), self.extract_outliers(pois, quota)?);
        }
        Ok(result)
    }

    /// Partition POIs into groups of at most `max_per_cluster`
    pub fn partition(&self, pois: Vec<Poi>, max_per_cluster: usize) -> Result<Vec<Vec<Poi>>> {
        let settings = PartitionSettings {
            seed: self.config.kmeans_seed,
            max_iterations: self.config.kmeans_max_iterations,
        };
        partition::partition(pois, max_per_cluster, &settings)
    }

    /// Order one day's POIs, first and last fixed
    pub fn sequence_day(&self, pois: Vec<Poi>) -> Result<SequencedDay> {
        sequencer::sequence_day(pois, self.config.max_interior)
    }
}
