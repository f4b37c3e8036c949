//! Trip planning service
//!
//! Ties the organizer to the directions provider for request-level
//! operations: outliers across a whole trip, grouping, and day routes.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{info, instrument, warn};

use crate::Result;
use crate::directions::DirectionsProvider;
use crate::models::{CitySelection, DayPlan, DayRoute, OutlierSplit, Poi, TransitionCode, poi::validate_all};
use crate::organizer::ItineraryOrganizer;

/// Request-level planner shared by all handlers
pub struct TripPlanner {
    organizer: ItineraryOrganizer,
    directions: Arc<dyn DirectionsProvider>,
    route_timeout: Duration,
}

impl TripPlanner {
    #[must_use]
    pub fn new(
        organizer: ItineraryOrganizer,
        directions: Arc<dyn DirectionsProvider>,
        route_timeout: Duration,
    ) -> Self {
        Self {
            organizer,
            directions,
            route_timeout,
        }
    }

    #[must_use]
    pub fn organizer(&self) -> &ItineraryOrganizer {
        &self.organizer
    }

    /// Outlier extraction for every city in trip order
    pub fn compute_outliers(
        &self,
        selection: &CitySelection,
        ordered_cities: &[String],
        transitions: &[TransitionCode],
    ) -> Result<BTreeMap<String, OutlierSplit>> {
        let result = self
            .organizer
            .extract_city_outliers(selection, ordered_cities, transitions)?;
        info!(
            cities = result.len(),
            outliers = result.values().map(|s| s.outliers.len()).sum::<usize>(),
            "computed trip outliers"
        );
        Ok(result)
    }

    /// Group POIs, falling back to the configured capacity
    pub fn cluster(&self, pois: Vec<Poi>, max_per_cluster: Option<usize>) -> Result<Vec<Vec<Poi>>> {
        let cap = max_per_cluster.unwrap_or(self.organizer.config().default_max_per_cluster);
        let poi_count = pois.len();
        let groups = self.organizer.partition(pois, cap)?;
        info!(pois = poi_count, groups = groups.len(), cap, "clustered POIs");
        Ok(groups)
    }

    /// Sequence one day and attach path geometry when the provider has it.
    ///
    /// Provider errors and timeouts leave the polyline unset; only invalid
    /// input fails the call.
    #[instrument(skip(self, pois), fields(pois = pois.len()))]
    pub async fn route_day(&self, day: u32, pois: Vec<Poi>) -> Result<DayRoute> {
        let sequenced = self.organizer.sequence_day(pois)?;

        let polyline = if sequenced.ordered.len() >= 2 {
            let stops: Vec<(f64, f64)> = sequenced.ordered.iter().map(Poi::coordinates).collect();
            match tokio::time::timeout(self.route_timeout, self.directions.fetch_route(&stops)).await {
                Ok(Ok(polyline)) => polyline,
                Ok(Err(e)) => {
                    warn!(day, "directions lookup failed: {e}");
                    None
                }
                Err(_) => {
                    warn!(day, timeout = ?self.route_timeout, "directions lookup timed out");
                    None
                }
            }
        } else {
            None
        };

        Ok(DayRoute {
            day,
            places: sequenced.ordered,
            distance_km: sequenced.distance_km,
            polyline,
        })
    }

    /// Route every day concurrently, preserving input order.
    ///
    /// Coordinates are checked for the whole trip before any day is routed,
    /// so a request either fails up front or every day gets a route.
    pub async fn route_days(&self, days: Vec<DayPlan>) -> Result<Vec<DayRoute>> {
        days.iter().try_for_each(|plan| validate_all(&plan.pois))?;
        let day_count = days.len();
        let routes = join_all(days.into_iter().map(|plan| self.route_day(plan.day, plan.pois)))
            .await
            .into_iter()
            .collect::<Result<Vec<_>>>()?;
        info!(
            days = day_count,
            with_geometry = routes.iter().filter(|r| r.has_geometry()).count(),
            "generated day routes"
        );
        Ok(routes)
    }
}
