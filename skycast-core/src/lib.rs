//! Core library for the `skycast` weather app.
//!
//! This crate defines:
//! - Domain models for current conditions and the 3-hourly forecast series
//! - Forecast aggregation into daily summaries and hourly slices
//! - The staleness policy for locally cached weather data
//! - Narrow interfaces over the weather provider, geocoding, device
//!   location and key-value persistence, plus the fetch orchestrator and
//!   debounced city search built on top of them
//!
//! It is used by `skycast-cli`, but can also be reused by other front ends.

pub mod cache;
pub mod config;
pub mod error;
pub mod forecast;
pub mod freshness;
pub mod location;
pub mod model;
pub mod provider;
pub mod search;
pub mod service;
pub mod store;
pub mod timeutil;

pub use cache::{CachedWeather, WeatherCache};
pub use config::Config;
pub use error::{LocationError, StoreError, WeatherError};
pub use forecast::{DailySummary, HourlySummary};
pub use location::{LocationProvider, NoLocation, StaticLocation};
pub use model::{CitySuggestion, CurrentWeather, ForecastResponse, ForecastSample, Location};
pub use provider::openweather::OpenWeather;
pub use provider::{GeocodingProvider, WeatherProvider};
pub use search::SuggestionSearch;
pub use service::{Phase, WeatherService, WeatherState};
pub use store::{FileStore, KeyValueStore, MemoryStore};
