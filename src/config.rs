//! Configuration management for `Tripcraft`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::TripcraftError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripcraftConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Directions provider settings
    #[serde(default)]
    pub directions: DirectionsConfig,
    /// Tuning for the clustering and sequencing algorithms
    #[serde(default)]
    pub organizer: OrganizerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_server_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u32,
}

/// Directions provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionsConfig {
    /// Directions API key. Without one no path geometry is fetched.
    pub api_key: Option<String>,
    /// Directions JSON endpoint
    #[serde(default = "default_directions_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_directions_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for transient failures
    #[serde(default = "default_directions_max_retries")]
    pub max_retries: u32,
}

/// Organizer tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizerConfig {
    /// Neighborhood radius for density clustering, in kilometers
    #[serde(default = "default_outlier_radius")]
    pub outlier_radius_km: f64,
    /// Minimum neighborhood size (including the point itself)
    #[serde(default = "default_outlier_min_samples")]
    pub outlier_min_samples: usize,
    /// Group capacity used when a request does not name one
    #[serde(default = "default_max_per_cluster")]
    pub default_max_per_cluster: usize,
    /// Seed for centroid initialization
    #[serde(default = "default_kmeans_seed")]
    pub kmeans_seed: u64,
    /// Upper bound on centroid refinement passes
    #[serde(default = "default_kmeans_max_iterations")]
    pub kmeans_max_iterations: usize,
    /// Largest interior stop count searched exhaustively; larger days use
    /// nearest neighbour plus 2-opt
    #[serde(default = "default_max_interior")]
    pub max_interior: usize,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_request_timeout() -> u32 {
    60
}

fn default_directions_base_url() -> String {
    "https://maps.googleapis.com/maps/api/directions/json".to_string()
}

fn default_directions_timeout() -> u32 {
    10
}

fn default_directions_max_retries() -> u32 {
    2
}

fn default_outlier_radius() -> f64 {
    2.0
}

fn default_outlier_min_samples() -> usize {
    2
}

fn default_max_per_cluster() -> usize {
    4
}

fn default_kmeans_seed() -> u64 {
    42
}

fn default_kmeans_max_iterations() -> usize {
    300
}

fn default_max_interior() -> usize {
    8
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_directions_base_url(),
            timeout_seconds: default_directions_timeout(),
            max_retries: default_directions_max_retries(),
        }
    }
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            outlier_radius_km: default_outlier_radius(),
            outlier_min_samples: default_outlier_min_samples(),
            default_max_per_cluster: default_max_per_cluster(),
            kmeans_seed: default_kmeans_seed(),
            kmeans_max_iterations: default_kmeans_max_iterations(),
            max_interior: default_max_interior(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl TripcraftConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // TRIPCRAFT_DIRECTIONS__API_KEY, TRIPCRAFT_SERVER__PORT, ...
        builder = builder.add_source(
            Environment::with_prefix("TRIPCRAFT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TripcraftConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tripcraft").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_server_host();
        }
        if self.server.port == 0 {
            self.server.port = default_server_port();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
        if self.directions.base_url.is_empty() {
            self.directions.base_url = default_directions_base_url();
        }
        if self.directions.timeout_seconds == 0 {
            self.directions.timeout_seconds = default_directions_timeout();
        }
        if self.organizer.outlier_radius_km <= 0.0 {
            self.organizer.outlier_radius_km = default_outlier_radius();
        }
        if self.organizer.outlier_min_samples == 0 {
            self.organizer.outlier_min_samples = default_outlier_min_samples();
        }
        if self.organizer.default_max_per_cluster == 0 {
            self.organizer.default_max_per_cluster = default_max_per_cluster();
        }
        if self.organizer.kmeans_max_iterations == 0 {
            self.organizer.kmeans_max_iterations = default_kmeans_max_iterations();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        if let Some(api_key) = &self.directions.api_key {
            if api_key.trim().is_empty() {
                return Err(TripcraftError::config(
                    "Directions API key cannot be empty if provided. Either remove it or provide a valid key."
                ).into());
            }

            if api_key.chars().any(char::is_whitespace) {
                return Err(TripcraftError::config(
                    "Directions API key must not contain whitespace"
                ).into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.directions.timeout_seconds > 120 {
            return Err(TripcraftError::config(
                "Directions timeout cannot exceed 120 seconds"
            ).into());
        }

        if self.directions.max_retries > 10 {
            return Err(TripcraftError::config(
                "Directions max retries cannot exceed 10"
            ).into());
        }

        if !self.organizer.outlier_radius_km.is_finite() || self.organizer.outlier_radius_km > 100.0 {
            return Err(TripcraftError::config(
                "Outlier radius must be a finite value no larger than 100 km"
            ).into());
        }

        if self.organizer.default_max_per_cluster > 50 {
            return Err(TripcraftError::config(
                "Default group capacity cannot exceed 50"
            ).into());
        }

        // 10! interior orderings is already ~3.6M path evaluations
        if self.organizer.max_interior > 10 {
            return Err(TripcraftError::config(
                "Max interior stops cannot exceed 10"
            ).into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TripcraftError::config(
                format!("Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_log_levels.join(", ")
                )
            ).into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TripcraftError::config(
                format!("Invalid log format '{}'. Must be one of: {}",
                    self.logging.format,
                    valid_log_formats.join(", ")
                )
            ).into());
        }

        if !self.directions.base_url.starts_with("http://") && !self.directions.base_url.starts_with("https://") {
            return Err(TripcraftError::config(
                "Directions base URL must be a valid HTTP or HTTPS URL"
            ).into());
        }

        Ok(())
    }
}
