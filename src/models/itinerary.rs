//! Itinerary-level models: city selections, transition codes and day routes

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::Poi;

/// City name mapped to the POIs the traveler picked there
pub type CitySelection = HashMap<String, Vec<Poi>>;

/// How travel into and out of a city is structured, per trip position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitionCode(pub i32);

impl TransitionCode {
    /// Number of outliers a city at this position has to give up.
    ///
    /// Codes 1 and 2 are single inter-city hops (one outlier day), code 3
    /// means the city is both entered and left on transit days (two).
    #[must_use]
    pub fn outlier_quota(self) -> usize {
        match self.0 {
            1 | 2 => 1,
            3 => 2,
            _ => 0,
        }
    }
}

/// Result of outlier extraction for one city
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutlierSplit {
    /// POIs that stay in the city's main visiting pool, in input order
    #[serde(rename = "monuments")]
    pub kept: Vec<Poi>,
    /// POIs set aside as outliers
    pub outliers: Vec<Poi>,
}

impl OutlierSplit {
    /// Everything kept, nothing extracted
    #[must_use]
    pub fn pass_through(pois: Vec<Poi>) -> Self {
        Self {
            kept: pois,
            outliers: Vec::new(),
        }
    }
}

/// A day's POIs in visiting order with the path length
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SequencedDay {
    pub ordered: Vec<Poi>,
    pub distance_km: f64,
}

/// POIs assigned to one itinerary day, before sequencing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: u32,
    #[serde(rename = "monuments", default)]
    pub pois: Vec<Poi>,
}

/// Ordered visiting sequence and drawable path for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRoute {
    pub day: u32,
    /// POIs in visiting order
    pub places: Vec<Poi>,
    /// Great-circle length of the visiting order
    pub distance_km: f64,
    /// Encoded polyline from the directions provider, if it returned one
    pub polyline: Option<String>,
}

impl DayRoute {
    #[must_use]
    pub fn has_geometry(&self) -> bool {
        self.polyline.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(2, 1)]
    #[case(3, 2)]
    #[case(4, 0)]
    #[case(-1, 0)]
    fn test_transition_code_quota(#[case] code: i32, #[case] expected: usize) {
        assert_eq!(TransitionCode(code).outlier_quota(), expected);
    }

    #[test]
    fn test_outlier_split_serializes_kept_as_monuments() {
        let split = OutlierSplit::pass_through(vec![Poi::new(1, "City Palace", "Jaipur", 26.92, 75.82)]);
        let json = serde_json::to_value(&split).unwrap();
        assert_eq!(json["monuments"].as_array().unwrap().len(), 1);
        assert!(json["outliers"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_day_plan_reads_monuments_field() {
        let plan: DayPlan = serde_json::from_str(
            r#"{"day": 2, "monuments": [{"name": "Jantar Mantar", "lat": 26.92, "lng": 75.82}]}"#,
        )
        .unwrap();
        assert_eq!(plan.day, 2);
        assert_eq!(plan.pois.len(), 1);
    }
}
