//! Error types and handling for `Tripcraft`

use thiserror::Error;

/// Main error type for the itinerary organizer
#[derive(Error, Debug)]
pub enum TripcraftError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Directions provider communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },
}

impl TripcraftError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Whether the caller supplied bad input
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, TripcraftError::Validation { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TripcraftError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            TripcraftError::Api { .. } => {
                "Unable to reach the directions service. Please try again later.".to_string()
            }
            TripcraftError::Validation { message } => {
                format!("Invalid input: {message}")
            }
        }
    }
}

impl From<reqwest_middleware::Error> for TripcraftError {
    fn from(err: reqwest_middleware::Error) -> Self {
        TripcraftError::api(err.to_string())
    }
}

impl From<reqwest::Error> for TripcraftError {
    fn from(err: reqwest::Error) -> Self {
        TripcraftError::api(err.to_string())
    }
}
