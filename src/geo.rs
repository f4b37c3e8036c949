//! Great-circle distance helpers

use haversine::{Location as HaversineLocation, Units};

use crate::models::Poi;

/// Haversine distance in kilometers on a 6371 km sphere.
///
/// NaN coordinates yield NaN; callers validate input first.
#[must_use]
pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    // Canonical argument order keeps the result bit-identical when swapped.
    let ((lat1, lon1), (lat2, lon2)) = if lat1.total_cmp(&lat2).then(lon1.total_cmp(&lon2)).is_le() {
        ((lat1, lon1), (lat2, lon2))
    } else {
        ((lat2, lon2), (lat1, lon1))
    };
    let from = HaversineLocation {
        latitude: lat1,
        longitude: lon1,
    };
    let to = HaversineLocation {
        latitude: lat2,
        longitude: lon2,
    };
    haversine::distance(from, to, Units::Kilometers)
}

/// Great-circle distance between two POIs in kilometers
#[must_use]
pub fn distance_between(a: &Poi, b: &Poi) -> f64 {
    distance(a.lat, a.lng, b.lat, b.lng)
}

/// Sum of consecutive great-circle legs along `pois`
#[must_use]
pub fn path_length(pois: &[Poi]) -> f64 {
    pois.windows(2)
        .map(|leg| distance_between(&leg[0], &leg[1]))
        .sum()
}

/// Straight-line distance treating lat/lng as a flat plane.
///
/// Only used to rank outlier candidates, where an approximation is enough.
#[must_use]
pub fn planar_distance(a: &Poi, b: &Poi) -> f64 {
    (a.lat - b.lat).hypot(a.lng - b.lng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_zero_for_identical_points() {
        assert_eq!(distance(26.9124, 75.7873, 26.9124, 75.7873), 0.0);
    }

    #[rstest]
    #[case(26.9124, 75.7873, 28.6139, 77.2090)]
    #[case(-33.8688, 151.2093, 51.5074, -0.1278)]
    #[case(0.0, 0.0, 0.0, 1.0)]
    fn test_symmetric(#[case] lat1: f64, #[case] lon1: f64, #[case] lat2: f64, #[case] lon2: f64) {
        assert_eq!(distance(lat1, lon1, lat2, lon2), distance(lat2, lon2, lat1, lon1));
    }

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        // 2 * pi * 6371 / 360
        let d = distance(0.0, 0.0, 0.0, 1.0);
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn test_nan_propagates() {
        assert!(distance(f64::NAN, 0.0, 1.0, 1.0).is_nan());
    }

    #[test]
    fn test_path_length() {
        let pois = vec![
            Poi::new(1, "A", "X", 0.0, 0.0),
            Poi::new(2, "B", "X", 0.0, 1.0),
            Poi::new(3, "C", "X", 0.0, 2.0),
        ];
        let expected = distance(0.0, 0.0, 0.0, 1.0) + distance(0.0, 1.0, 0.0, 2.0);
        assert!((path_length(&pois) - expected).abs() < 1e-9);
        assert_eq!(path_length(&pois[..1]), 0.0);
        assert_eq!(path_length(&[]), 0.0);
    }

    #[test]
    fn test_planar_distance() {
        let a = Poi::new(1, "A", "X", 0.0, 0.0);
        let b = Poi::new(2, "B", "X", 3.0, 4.0);
        assert_eq!(planar_distance(&a, &b), 5.0);
    }
}
