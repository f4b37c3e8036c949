//! Router-level tests driven through `tower::ServiceExt::oneshot`

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use tripcraft::api::AppState;
use tripcraft::{DirectionsProvider, ItineraryOrganizer, SeenPlaces, TripPlanner, web};

struct EchoDirections;

#[async_trait]
impl DirectionsProvider for EchoDirections {
    async fn fetch_route(&self, stops: &[(f64, f64)]) -> tripcraft::Result<Option<String>> {
        Ok(Some(format!("stops:{}", stops.len())))
    }
}

fn test_app(seen_places: Arc<SeenPlaces>) -> Router {
    let planner = TripPlanner::new(
        ItineraryOrganizer::default(),
        Arc::new(EchoDirections),
        Duration::from_secs(1),
    );
    let state = AppState {
        planner: Arc::new(planner),
        seen_places,
    };
    web::app(state, Duration::from_secs(5))
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn monument(id: u64, city: &str, lat: f64, lng: f64) -> Value {
    json!({ "id": id, "name": format!("M{id}"), "city": city, "lat": lat, "lng": lng, "type": "monument" })
}

#[tokio::test]
async fn test_compute_outliers_endpoint() {
    let body = json!({
        "cityWiseSelection": {
            "Jaipur": { "monuments": [
                monument(1, "Jaipur", 26.9124, 75.7873),
                monument(2, "Jaipur", 26.9133, 75.7873),
                monument(3, "Jaipur", 27.3620, 75.7873)
            ]},
            "Agra": { "monuments": [ monument(4, "Agra", 27.1751, 78.0421) ] }
        },
        "interCityMap": [1, 0, 3],
        "orderedCities": ["Jaipur", "Agra", "Delhi"]
    });

    let (status, value) = post_json(test_app(Arc::new(SeenPlaces::new())), "/api/compute-outliers", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["Jaipur"]["outliers"][0]["id"], 3);
    assert_eq!(value["Jaipur"]["monuments"].as_array().unwrap().len(), 2);
    assert_eq!(value["Agra"]["monuments"].as_array().unwrap().len(), 1);
    assert!(value["Delhi"]["monuments"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_cluster_endpoint_defaults_capacity() {
    let monuments: Vec<Value> = (0..9)
        .map(|i| monument(i, "Jaipur", 26.9 + (i % 3) as f64 * 0.01, 75.8 + (i / 3) as f64 * 0.01))
        .collect();
    let (status, value) = post_json(
        test_app(Arc::new(SeenPlaces::new())),
        "/api/cluster-monuments",
        json!({ "monuments": monuments }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let clusters = value["clusters"].as_array().unwrap();
    let total: usize = clusters.iter().map(|c| c.as_array().unwrap().len()).sum();
    assert_eq!(total, 9);
    assert!(clusters.iter().all(|c| c.as_array().unwrap().len() <= 4));
}

#[tokio::test]
async fn test_cluster_endpoint_rejects_zero_capacity() {
    let (status, value) = post_json(
        test_app(Arc::new(SeenPlaces::new())),
        "/api/cluster-monuments",
        json!({ "monuments": [monument(1, "Jaipur", 26.9, 75.8)], "max_per_cluster": 0 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(value["error"].as_str().unwrap().contains("max_per_cluster"));
}

#[tokio::test]
async fn test_cluster_endpoint_rejects_negative_capacity() {
    let (status, value) = post_json(
        test_app(Arc::new(SeenPlaces::new())),
        "/api/cluster-monuments",
        json!({ "monuments": [monument(1, "Jaipur", 26.9, 75.8)], "max_per_cluster": -1 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(value["error"].as_str().unwrap().starts_with("Invalid input"));
}

#[tokio::test]
async fn test_non_numeric_latitude_is_bad_request() {
    let body = json!({
        "monuments": [{ "id": 1, "name": "Hawa Mahal", "lat": "x", "lng": 75.8 }],
        "max_per_cluster": 4
    });
    let (status, value) = post_json(test_app(Arc::new(SeenPlaces::new())), "/api/cluster-monuments", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(value["error"].is_string());
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let padding = "x".repeat(2 * 1024 * 1024);
    let (status, value) = post_json(
        test_app(Arc::new(SeenPlaces::new())),
        "/api/cluster-monuments",
        json!({ "monuments": [], "padding": padding }),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(value["error"].is_string());
}

#[tokio::test]
async fn test_generate_day_route_with_long_day() {
    let long_day: Vec<Value> = (0..11)
        .map(|i| monument(100 + i, "X", 0.0, ((i * 7) % 11) as f64 * 0.1))
        .collect();
    let body = json!({
        "rawItinerary": [
            { "day": 1, "monuments": [
                monument(1, "X", 0.0, 0.0),
                monument(2, "X", 0.0, 1.0),
                monument(3, "X", 0.0, 2.0)
            ]},
            { "day": 2, "monuments": long_day }
        ]
    });
    let (status, value) = post_json(test_app(Arc::new(SeenPlaces::new())), "/api/generate-day-route", body).await;
    assert_eq!(status, StatusCode::OK);
    let routes = value["routes"].as_array().unwrap();
    assert_eq!(routes[0]["places"].as_array().unwrap().len(), 3);
    assert_eq!(routes[1]["places"].as_array().unwrap().len(), 11);
    assert_eq!(routes[1]["polyline"], "stops:11");
}

#[tokio::test]
async fn test_generate_day_route_endpoint() {
    let body = json!({
        "rawItinerary": [
            { "day": 1, "monuments": [
                monument(1, "X", 0.0, 0.0),
                monument(3, "X", 0.0, 2.0),
                monument(2, "X", 0.0, 1.0),
                monument(4, "X", 0.0, 3.0)
            ]},
            { "day": 2, "monuments": [ monument(5, "X", 0.0, 0.0) ] }
        ]
    });
    let (status, value) = post_json(test_app(Arc::new(SeenPlaces::new())), "/api/generate-day-route", body).await;
    assert_eq!(status, StatusCode::OK);

    let routes = value["routes"].as_array().unwrap();
    assert_eq!(routes.len(), 2);
    let order: Vec<u64> = routes[0]["places"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_u64().unwrap())
        .collect();
    assert_eq!(order, vec![1, 2, 3, 4]);
    assert_eq!(routes[0]["polyline"], "stops:4");
    assert!(routes[1]["polyline"].is_null());
}

#[tokio::test]
async fn test_reset_monuments_clears_registry() {
    let seen = Arc::new(SeenPlaces::new());
    seen.is_duplicate("ChIJ-hawa-mahal");
    let (status, value) = post_json(test_app(seen.clone()), "/api/reset-monuments", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["status"], "cleared");
    assert!(seen.is_empty());
}
