//! Outlier extraction for a single city
//!
//! Density clustering finds isolated POIs first. If it finds fewer than the
//! quota, the remainder is taken from the POIs that sit furthest, on
//! average, from everything else in the city.

use std::cmp::Ordering;

use tracing::debug;

use super::dbscan::Dbscan;
use crate::Result;
use crate::geo::planar_distance;
use crate::models::{OutlierSplit, Poi, poi::validate_all};

/// Mean planar distance from `pois[idx]` to every other entry
fn mean_planar_distance(pois: &[Poi], idx: usize) -> f64 {
    let others = pois.len().saturating_sub(1);
    if others == 0 {
        return 0.0;
    }
    let total: f64 = pois
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != idx)
        .map(|(_, other)| planar_distance(&pois[idx], other))
        .sum();
    total / others as f64
}

/// Split `pois` into kept POIs and up to `quota` outliers.
///
/// `quota == 0` or fewer POIs than the quota is a pass-through. Otherwise
/// exactly `quota` outliers are returned: noise points in input order,
/// topped up by descending mean planar distance.
pub fn extract_outliers(pois: Vec<Poi>, quota: usize, clustering: &Dbscan) -> Result<OutlierSplit> {
    validate_all(&pois)?;

    if quota == 0 || pois.len() < quota {
        return Ok(OutlierSplit::pass_through(pois));
    }

    let mut chosen: Vec<usize> = clustering.noise_indices(&pois);
    chosen.truncate(quota);
    let from_noise = chosen.len();

    if chosen.len() < quota {
        let mut candidates: Vec<(usize, f64)> = (0..pois.len())
            .filter(|idx| !chosen.contains(idx))
            .map(|idx| (idx, mean_planar_distance(&pois, idx)))
            .collect();
        // Stable: equal means keep input order.
        candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        let needed = quota - chosen.len();
        chosen.extend(candidates.into_iter().take(needed).map(|(idx, _)| idx));
    }

    debug!(
        city = pois.first().map(|p| p.city.as_str()).unwrap_or_default(),
        quota,
        from_noise,
        from_fallback = chosen.len() - from_noise,
        "outliers selected"
    );

    let mut slots: Vec<Option<Poi>> = pois.into_iter().map(Some).collect();
    let outliers: Vec<Poi> = chosen.iter().filter_map(|&idx| slots[idx].take()).collect();
    let kept: Vec<Poi> = slots.into_iter().flatten().collect();

    Ok(OutlierSplit { kept, outliers })
}
