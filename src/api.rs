//! HTTP handlers for the itinerary organizer
//!
//! Request and response shapes follow the front end's JSON field names.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{FromRequest, Request, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error};

use crate::TripcraftError;
use crate::dedup::SeenPlaces;
use crate::models::{CitySelection, DayPlan, DayRoute, OutlierSplit, Poi, TransitionCode};
use crate::planner::TripPlanner;

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<TripPlanner>,
    pub seen_places: Arc<SeenPlaces>,
}

/// Error wrapper mapping organizer errors and body rejections to HTTP
/// responses with an `{error}` body
pub enum ApiError {
    Organizer(TripcraftError),
    Body(JsonRejection),
}

impl From<TripcraftError> for ApiError {
    fn from(err: TripcraftError) -> Self {
        Self::Organizer(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Organizer(err) => {
                let status = if err.is_validation() {
                    StatusCode::BAD_REQUEST
                } else {
                    error!("request failed: {err}");
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                (status, err.user_message())
            }
            Self::Body(rejection) => {
                // Malformed or mistyped fields are bad input like any other.
                let status = match &rejection {
                    JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                        StatusCode::BAD_REQUEST
                    }
                    _ => rejection.status(),
                };
                debug!(%status, "rejected request body: {}", rejection.body_text());
                (status, format!("Invalid input: {}", rejection.body_text()))
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// `Json` extractor whose rejections go through [`ApiError`]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CityPicks {
    #[serde(default)]
    pub monuments: Vec<Poi>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlierRequest {
    pub city_wise_selection: HashMap<String, CityPicks>,
    pub inter_city_map: Vec<TransitionCode>,
    pub ordered_cities: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClusterRequest {
    pub monuments: Vec<Poi>,
    pub max_per_cluster: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ClusterResponse {
    pub clusters: Vec<Vec<Poi>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRouteRequest {
    pub raw_itinerary: Vec<DayPlan>,
}

#[derive(Debug, Serialize)]
pub struct DayRouteResponse {
    pub routes: Vec<DayRoute>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/compute-outliers", post(compute_outliers))
        .route("/cluster-monuments", post(cluster_monuments))
        .route("/generate-day-route", post(generate_day_route))
        .route("/reset-monuments", post(reset_monuments))
        .with_state(state)
}

async fn compute_outliers(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<OutlierRequest>,
) -> Result<Json<BTreeMap<String, OutlierSplit>>, ApiError> {
    let selection: CitySelection = request
        .city_wise_selection
        .into_iter()
        .map(|(city, picks)| (city, picks.monuments))
        .collect();
    let result = state.planner.compute_outliers(
        &selection,
        &request.ordered_cities,
        &request.inter_city_map,
    )?;
    Ok(Json(result))
}

async fn cluster_monuments(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ClusterRequest>,
) -> Result<Json<ClusterResponse>, ApiError> {
    let clusters = state
        .planner
        .cluster(request.monuments, request.max_per_cluster)?;
    Ok(Json(ClusterResponse { clusters }))
}

async fn generate_day_route(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<DayRouteRequest>,
) -> Result<Json<DayRouteResponse>, ApiError> {
    let routes = state.planner.route_days(request.raw_itinerary).await?;
    Ok(Json(DayRouteResponse { routes }))
}

async fn reset_monuments(State(state): State<AppState>) -> Json<serde_json::Value> {
    state.seen_places.reset();
    Json(json!({ "status": "cleared" }))
}
