use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::WeatherError;
use crate::model::{CitySuggestion, CurrentWeather, ForecastResponse, Location};

use super::{GeocodingProvider, WeatherProvider};

const DEFAULT_DATA_URL: &str = "https://api.openweathermap.org/data/2.5";
const DEFAULT_GEO_URL: &str = "https://api.openweathermap.org/geo/1.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Suggestion queries below this length skip the lookup entirely.
pub const MIN_QUERY_CHARS: usize = 2;

/// OpenWeatherMap client covering both the data and geocoding APIs.
///
/// All requests carry the configured `appid` and ask for metric units.
#[derive(Debug, Clone)]
pub struct OpenWeather {
    api_key: String,
    data_url: String,
    geo_url: String,
    http: Client,
}

impl OpenWeather {
    pub fn new(api_key: String) -> Result<Self, WeatherError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            api_key,
            data_url: DEFAULT_DATA_URL.to_string(),
            geo_url: DEFAULT_GEO_URL.to_string(),
            http,
        })
    }

    /// Point the client at a different host, e.g. a local mock server.
    pub fn with_base_urls(mut self, data_url: impl Into<String>, geo_url: impl Into<String>) -> Self {
        self.data_url = data_url.into();
        self.geo_url = geo_url.into();
        self
    }

    /// Issue a GET, check the status, then parse the body. Failed lookups by
    /// city name carry the name so a 404 can be reported as "city not found".
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: String,
        query: &[(&str, &str)],
        city: Option<&str>,
    ) -> Result<T, WeatherError> {
        let res = self.http.get(&url).query(query).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(error_for_status(status, &body, city));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeather {
    async fn current_by_coords(&self, location: Location) -> Result<CurrentWeather, WeatherError> {
        let lat = location.latitude.to_string();
        let lon = location.longitude.to_string();
        self.get_json(
            format!("{}/weather", self.data_url),
            &[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ],
            None,
        )
        .await
    }

    async fn current_by_city(&self, city: &str) -> Result<CurrentWeather, WeatherError> {
        self.get_json(
            format!("{}/weather", self.data_url),
            &[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")],
            Some(city),
        )
        .await
    }

    async fn forecast_by_coords(
        &self,
        location: Location,
    ) -> Result<ForecastResponse, WeatherError> {
        let lat = location.latitude.to_string();
        let lon = location.longitude.to_string();
        self.get_json(
            format!("{}/forecast", self.data_url),
            &[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ],
            None,
        )
        .await
    }

    async fn forecast_by_city(&self, city: &str) -> Result<ForecastResponse, WeatherError> {
        self.get_json(
            format!("{}/forecast", self.data_url),
            &[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")],
            Some(city),
        )
        .await
    }
}

#[async_trait]
impl GeocodingProvider for OpenWeather {
    async fn city_suggestions(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CitySuggestion>, WeatherError> {
        let trimmed = query.trim();
        if trimmed.chars().count() < MIN_QUERY_CHARS {
            return Ok(Vec::new());
        }

        let limit = limit.to_string();
        self.get_json(
            format!("{}/direct", self.geo_url),
            &[("q", trimmed), ("limit", limit.as_str()), ("appid", self.api_key.as_str())],
            None,
        )
        .await
    }
}

/// Non-2xx responses carry a `{message}` body.
#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    message: String,
}

fn error_for_status(status: StatusCode, body: &str, city: Option<&str>) -> WeatherError {
    let message = serde_json::from_str::<ApiMessage>(body)
        .map(|m| m.message)
        .unwrap_or_default();

    match status {
        StatusCode::NOT_FOUND => match city {
            Some(name) => WeatherError::CityNotFound(name.to_string()),
            None => WeatherError::Api { status: status.as_u16(), message },
        },
        StatusCode::UNAUTHORIZED => WeatherError::InvalidApiKey,
        StatusCode::TOO_MANY_REQUESTS => WeatherError::RateLimited,
        StatusCode::BAD_REQUEST => WeatherError::BadRequest(if message.is_empty() {
            "bad request".to_string()
        } else {
            message
        }),
        _ => WeatherError::Api { status: status.as_u16(), message },
    }
}
