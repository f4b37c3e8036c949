//! Capacity-constrained partitioning of a trip's POIs into visiting groups

use std::collections::BTreeMap;

use tracing::debug;

use super::kmeans::KMeans;
use crate::models::{Poi, poi::validate_all};
use crate::{Result, TripcraftError};

/// Centroid settings shared by every partition call
#[derive(Debug, Clone, Copy)]
pub struct PartitionSettings {
    pub seed: u64,
    pub max_iterations: usize,
}

/// Partition `pois` into spatially coherent groups of at most
/// `max_per_cluster`.
///
/// k-means proposes `ceil(n / max_per_cluster)` groups; oversize groups
/// keep their first `max_per_cluster` members and the overflow is placed
/// first-fit, opening new groups at the end when nothing has room.
pub fn partition(
    pois: Vec<Poi>,
    max_per_cluster: usize,
    settings: &PartitionSettings,
) -> Result<Vec<Vec<Poi>>> {
    if max_per_cluster < 1 {
        return Err(TripcraftError::validation(
            "max_per_cluster must be at least 1",
        ));
    }
    validate_all(&pois)?;

    if pois.is_empty() {
        return Ok(vec![]);
    }

    let k = pois.len().div_ceil(max_per_cluster);
    let points: Vec<[f64; 2]> = pois.iter().map(|p| [p.lat, p.lng]).collect();
    let labels = KMeans::new(k, settings.seed, settings.max_iterations).fit(&points);

    let mut by_label: BTreeMap<usize, Vec<Poi>> = BTreeMap::new();
    for (label, poi) in labels.into_iter().zip(pois) {
        by_label.entry(label).or_default().push(poi);
    }

    let mut groups: Vec<Vec<Poi>> = Vec::with_capacity(by_label.len());
    let mut overflow: Vec<Poi> = Vec::new();
    for (_, mut group) in by_label {
        if group.len() > max_per_cluster {
            overflow.extend(group.split_off(max_per_cluster));
        }
        groups.push(group);
    }

    let overflow_count = overflow.len();
    for poi in overflow {
        match groups.iter_mut().find(|g| g.len() < max_per_cluster) {
            Some(group) => group.push(poi),
            None => groups.push(vec![poi]),
        }
    }

    debug!(
        k,
        groups = groups.len(),
        overflow = overflow_count,
        max_per_cluster,
        "partitioned POIs"
    );
    Ok(groups)
}
