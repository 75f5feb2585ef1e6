//! Abstractions over the upstream weather and geocoding services.
//!
//! The orchestrator and search layers depend on these traits only; tests
//! substitute fakes, and `openweather` supplies the real implementation.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::WeatherError;
use crate::model::{CitySuggestion, CurrentWeather, ForecastResponse, Location};

pub mod openweather;

/// Source of current conditions and the 3-hourly forecast series.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_by_coords(&self, location: Location) -> Result<CurrentWeather, WeatherError>;

    /// A name-based query; the response echoes the resolved coordinates.
    async fn current_by_city(&self, city: &str) -> Result<CurrentWeather, WeatherError>;

    async fn forecast_by_coords(&self, location: Location)
    -> Result<ForecastResponse, WeatherError>;

    async fn forecast_by_city(&self, city: &str) -> Result<ForecastResponse, WeatherError>;
}

/// City lookup for search-as-you-type suggestions.
#[async_trait]
pub trait GeocodingProvider: Send + Sync + Debug {
    /// Queries shorter than two characters resolve to an empty list without
    /// touching the network.
    async fn city_suggestions(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CitySuggestion>, WeatherError>;
}
