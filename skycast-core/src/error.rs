//! Error taxonomy shared across the crate.
//!
//! Display strings double as the human-readable messages the orchestrator
//! stores in its `error` state field, so they are written for end users.

use thiserror::Error;

/// Failures from the weather and geocoding providers.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Unable to connect. Please check your internet connection.")]
    Network(#[from] reqwest::Error),

    #[error("City '{0}' not found. Please try a different city name.")]
    CityNotFound(String),

    #[error("API key is invalid. Please check your configuration.")]
    InvalidApiKey,

    #[error("Too many requests. Please wait a moment and try again.")]
    RateLimited,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Failed to parse weather data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0}")]
    Location(#[from] LocationError),

    #[error("Weather service error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// Failures from the device-location collaborator.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Location permission denied. Please enable location access in settings.")]
    PermissionDenied,

    #[error("Location request timed out")]
    Timeout,

    #[error("Location service unavailable")]
    ServiceUnavailable,

    #[error("Location error: {0}")]
    Other(String),
}

/// Failures from the key-value store. These are logged and swallowed at the
/// orchestrator boundary, never shown to the user.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
