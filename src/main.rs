use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use tripcraft::api::AppState;
use tripcraft::config::LoggingConfig;
use tripcraft::{
    DirectionsProvider, GoogleDirectionsClient, ItineraryOrganizer, NoDirections, SeenPlaces,
    TripPlanner, TripcraftConfig, web,
};

fn init_tracing(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = TripcraftConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    let directions: Arc<dyn DirectionsProvider> = if config.directions.api_key.is_some() {
        Arc::new(GoogleDirectionsClient::new(&config.directions)?)
    } else {
        tracing::warn!("No directions API key configured; day routes will have no geometry");
        Arc::new(NoDirections)
    };

    let planner = TripPlanner::new(
        ItineraryOrganizer::new(config.organizer.clone()),
        directions,
        Duration::from_secs(config.directions.timeout_seconds.into()),
    );
    let state = AppState {
        planner: Arc::new(planner),
        seen_places: Arc::new(SeenPlaces::new()),
    };

    web::run(&config.server, state).await
}
