//! Density-based clustering (DBSCAN) over POI coordinates
//!
//! Neighborhoods use great-circle distance. A point's neighborhood includes
//! the point itself, so `min_samples = 2` means "at least one other POI
//! within the radius".

use std::collections::VecDeque;

use tracing::debug;

use crate::geo;
use crate::models::Poi;

/// Cluster assignment for one point. `None` marks noise.
pub type Label = Option<usize>;

/// Density clustering parameters
#[derive(Debug, Clone, Copy)]
pub struct Dbscan {
    /// Neighborhood radius in kilometers
    pub eps_km: f64,
    /// Minimum neighborhood size for a core point
    pub min_samples: usize,
}

impl Dbscan {
    #[must_use]
    pub fn new(eps_km: f64, min_samples: usize) -> Self {
        Self { eps_km, min_samples }
    }

    /// Label every POI with a cluster id, or `None` for noise.
    ///
    /// Cluster ids are assigned in order of the first core point found.
    #[must_use]
    pub fn fit(&self, pois: &[Poi]) -> Vec<Label> {
        let n = pois.len();
        let mut labels: Vec<Label> = vec![None; n];
        let mut visited = vec![false; n];
        let mut next_cluster = 0;

        for start in 0..n {
            if visited[start] {
                continue;
            }
            visited[start] = true;

            let neighbors = self.region_query(pois, start);
            if neighbors.len() < self.min_samples {
                // May still be claimed later as a border point.
                continue;
            }

            let cluster = next_cluster;
            next_cluster += 1;
            labels[start] = Some(cluster);

            let mut queue: VecDeque<usize> = neighbors.into();
            while let Some(idx) = queue.pop_front() {
                if labels[idx].is_none() {
                    labels[idx] = Some(cluster);
                }
                if visited[idx] {
                    continue;
                }
                visited[idx] = true;

                let expansion = self.region_query(pois, idx);
                if expansion.len() >= self.min_samples {
                    queue.extend(expansion);
                }
            }
        }

        debug!(
            points = n,
            clusters = next_cluster,
            noise = labels.iter().filter(|l| l.is_none()).count(),
            "density clustering finished"
        );
        labels
    }

    /// Indices of the POIs in input order that are noise
    #[must_use]
    pub fn noise_indices(&self, pois: &[Poi]) -> Vec<usize> {
        self.fit(pois)
            .iter()
            .enumerate()
            .filter_map(|(idx, label)| label.is_none().then_some(idx))
            .collect()
    }

    fn region_query(&self, pois: &[Poi], idx: usize) -> Vec<usize> {
        let center = &pois[idx];
        pois.iter()
            .enumerate()
            .filter(|(_, other)| geo::distance_between(center, other) <= self.eps_km)
            .map(|(i, _)| i)
            .collect()
    }
}
