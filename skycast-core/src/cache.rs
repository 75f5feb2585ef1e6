//! Cached weather state: field-per-key persistence through a [`KeyValueStore`].
//!
//! Every read and write here is best-effort. A failing or corrupt entry
//! degrades to "no cache available" and is logged; nothing in this module
//! surfaces an error to the user.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::model::{CurrentWeather, ForecastSample, Location};
use crate::store::KeyValueStore;

pub const KEY_CURRENT_WEATHER: &str = "current_weather";
pub const KEY_FORECAST: &str = "forecast";
pub const KEY_LOCATION: &str = "location";
pub const KEY_CITY_NAME: &str = "city_name";
pub const KEY_FAVORITE_CITIES: &str = "favorite_cities";
pub const KEY_LAST_UPDATED: &str = "last_updated";

/// Keys removed by [`WeatherCache::clear`]. Favorites survive a cache clear.
const WEATHER_KEYS: &[&str] = &[
    KEY_CURRENT_WEATHER,
    KEY_FORECAST,
    KEY_LOCATION,
    KEY_CITY_NAME,
    KEY_LAST_UPDATED,
];

/// Everything the orchestrator persists after a successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedWeather {
    pub current: CurrentWeather,
    pub samples: Vec<ForecastSample>,
    pub location: Option<Location>,
    pub city_name: String,
    pub last_updated_ms: i64,
}

#[derive(Debug)]
pub struct WeatherCache {
    store: Box<dyn KeyValueStore>,
}

impl WeatherCache {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Cached state from a previous run. Requires current weather, forecast
    /// and timestamp; location and city name are optional extras. Freshness
    /// is the caller's decision, and stale entries are not discarded here.
    pub async fn load(&self) -> Option<CachedWeather> {
        let current: CurrentWeather = self.read_json(KEY_CURRENT_WEATHER).await?;
        let samples: Vec<ForecastSample> = self.read_json(KEY_FORECAST).await?;
        let last_updated_ms: i64 = self.read_json(KEY_LAST_UPDATED).await?;
        let location: Option<Location> = self.read_json(KEY_LOCATION).await;
        let city_name: String = self.read_json(KEY_CITY_NAME).await.unwrap_or_default();

        Some(CachedWeather { current, samples, location, city_name, last_updated_ms })
    }

    /// Best-effort write of all fields; failures are logged, never surfaced.
    pub async fn save(&self, snapshot: &CachedWeather) {
        self.write_json(KEY_CURRENT_WEATHER, &snapshot.current).await;
        self.write_json(KEY_FORECAST, &snapshot.samples).await;
        if let Some(location) = &snapshot.location {
            self.write_json(KEY_LOCATION, location).await;
        }
        self.write_json(KEY_CITY_NAME, &snapshot.city_name).await;
        self.write_json(KEY_LAST_UPDATED, &snapshot.last_updated_ms).await;
    }

    pub async fn favorites(&self) -> Vec<String> {
        self.read_json(KEY_FAVORITE_CITIES).await.unwrap_or_default()
    }

    /// Append a city unless it is already present.
    pub async fn add_favorite(&self, city: &str) {
        let mut favorites = self.favorites().await;
        if !favorites.iter().any(|c| c == city) {
            favorites.push(city.to_string());
            self.write_json(KEY_FAVORITE_CITIES, &favorites).await;
        }
    }

    pub async fn remove_favorite(&self, city: &str) {
        let mut favorites = self.favorites().await;
        favorites.retain(|c| c != city);
        self.write_json(KEY_FAVORITE_CITIES, &favorites).await;
    }

    pub async fn is_favorite(&self, city: &str) -> bool {
        self.favorites().await.iter().any(|c| c == city)
    }

    /// Drop all cached weather fields. Favorites survive.
    pub async fn clear(&self) {
        for key in WEATHER_KEYS {
            if let Err(error) = self.store.remove(key).await {
                tracing::warn!(key, %error, "cache remove failed");
            }
        }
    }

    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key).await {
            Ok(value) => value?,
            Err(error) => {
                tracing::warn!(key, %error, "cache read failed");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::warn!(key, %error, "cache entry corrupt");
                None
            }
        }
    }

    async fn write_json<T: Serialize>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(error) => {
                tracing::warn!(key, %error, "cache serialization failed");
                return;
            }
        };

        if let Err(error) = self.store.set(key, &raw).await {
            tracing::warn!(key, %error, "cache write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Condition, Coord, Measurements, Wind};
    use crate::store::{KeyValueStore, MemoryStore};

    fn snapshot(city: &str, last_updated_ms: i64) -> CachedWeather {
        let current = CurrentWeather {
            coord: Coord { lat: 51.51, lon: -0.13 },
            weather: vec![Condition {
                id: 800,
                main: "Clear".into(),
                description: "clear sky".into(),
                icon: "01d".into(),
            }],
            main: Measurements { temp: 18.3, feels_like: 17.9, humidity: 60, pressure: 1014.0 },
            wind: Wind { speed: 3.4, deg: 220.0 },
            name: city.to_string(),
            dt: 1_700_000_000,
        };
        let samples = vec![ForecastSample {
            dt: 1_700_000_000,
            main: Measurements { temp: 12.0, feels_like: 11.0, humidity: 70, pressure: 1010.0 },
            weather: current.weather.clone(),
        }];

        CachedWeather {
            current,
            samples,
            location: Some(Location { latitude: 51.51, longitude: -0.13 }),
            city_name: city.to_string(),
            last_updated_ms,
        }
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let cache = WeatherCache::new(Box::new(MemoryStore::new()));
        let written = snapshot("London", 1_700_000_000_000);

        cache.save(&written).await;
        let loaded = cache.load().await.expect("cache populated");
        assert_eq!(loaded, written);
    }

    #[tokio::test]
    async fn load_from_an_empty_store_is_none() {
        let cache = WeatherCache::new(Box::new(MemoryStore::new()));
        assert!(cache.load().await.is_none());
    }

    #[tokio::test]
    async fn corrupt_entry_degrades_to_no_cache() {
        let store = MemoryStore::new();
        store.set(KEY_CURRENT_WEATHER, "definitely not json").await.expect("writable");

        let cache = WeatherCache::new(Box::new(store));
        assert!(cache.load().await.is_none());
    }

    #[tokio::test]
    async fn favorites_default_to_empty_and_deduplicate() {
        let cache = WeatherCache::new(Box::new(MemoryStore::new()));
        assert!(cache.favorites().await.is_empty());

        cache.add_favorite("London").await;
        cache.add_favorite("Paris").await;
        cache.add_favorite("London").await;
        assert_eq!(cache.favorites().await, vec!["London".to_string(), "Paris".to_string()]);
        assert!(cache.is_favorite("Paris").await);

        cache.remove_favorite("London").await;
        assert_eq!(cache.favorites().await, vec!["Paris".to_string()]);
        assert!(!cache.is_favorite("London").await);
    }

    #[tokio::test]
    async fn clear_drops_weather_but_keeps_favorites() {
        let cache = WeatherCache::new(Box::new(MemoryStore::new()));
        cache.save(&snapshot("London", 1_700_000_000_000)).await;
        cache.add_favorite("London").await;

        cache.clear().await;
        assert!(cache.load().await.is_none());
        assert_eq!(cache.favorites().await, vec!["London".to_string()]);
    }
}
