//! Fetch orchestration: the state machine behind the weather screen.
//!
//! All transitions replace the state snapshot wholesale rather than mutating
//! in place, and every provider or geolocation failure is mapped to a
//! human-readable message in the `error` field; nothing propagates to the
//! presentation layer as a panic or unhandled error.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use chrono::Utc;

use crate::cache::{CachedWeather, WeatherCache};
use crate::error::WeatherError;
use crate::freshness::{self, CACHE_TTL};
use crate::location::LocationProvider;
use crate::model::{CurrentWeather, ForecastSample, Location};
use crate::provider::WeatherProvider;
use crate::store::KeyValueStore;

/// Coarse lifecycle phase, derived from the state fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// One immutable snapshot of everything the presentation layer renders.
///
/// `error` and the weather fields are independent: a failed refresh keeps
/// the previously fetched data visible alongside its error message.
#[derive(Debug, Clone, Default)]
pub struct WeatherState {
    pub current: Option<CurrentWeather>,
    pub samples: Vec<ForecastSample>,
    pub location: Option<Location>,
    pub city_name: String,
    pub loading: bool,
    pub error: Option<String>,
    pub last_updated_ms: Option<i64>,
}

impl WeatherState {
    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Failed
        } else if self.current.is_some() {
            Phase::Ready
        } else {
            Phase::Idle
        }
    }
}

/// Owns the in-memory weather state and coordinates cache, provider and
/// geolocation collaborators.
///
/// Overlapping fetches are not serialized. Each fetch takes a ticket from a
/// monotonic counter, and only the most recently started fetch may commit
/// its result, so a slow stale response can never overwrite a newer one.
#[derive(Debug)]
pub struct WeatherService {
    provider: Box<dyn WeatherProvider>,
    locator: Box<dyn LocationProvider>,
    cache: WeatherCache,
    state: RwLock<WeatherState>,
    fetch_seq: AtomicU64,
}

impl WeatherService {
    pub fn new(
        provider: Box<dyn WeatherProvider>,
        locator: Box<dyn LocationProvider>,
        store: Box<dyn KeyValueStore>,
    ) -> Self {
        Self {
            provider,
            locator,
            cache: WeatherCache::new(store),
            state: RwLock::new(WeatherState::default()),
            fetch_seq: AtomicU64::new(0),
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> WeatherState {
        self.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn cache(&self) -> &WeatherCache {
        &self.cache
    }

    /// Startup cache read. Populates state only when the cached data is
    /// still fresh; stale data stays on disk but does not skip the network.
    /// Returns whether state was populated.
    pub async fn load_from_cache(&self) -> bool {
        let Some(cached) = self.cache.load().await else {
            return false;
        };

        if !freshness::is_fresh(cached.last_updated_ms, now_millis(), CACHE_TTL) {
            tracing::debug!("cached weather is stale, waiting for a fetch");
            return false;
        }

        self.replace_state(WeatherState {
            current: Some(cached.current),
            samples: cached.samples,
            location: cached.location,
            city_name: cached.city_name,
            loading: false,
            error: None,
            last_updated_ms: Some(cached.last_updated_ms),
        });
        true
    }

    /// Fetch current conditions and forecast for known coordinates. Both
    /// requests run concurrently and both must succeed before anything is
    /// committed to state or cache.
    pub async fn fetch_by_location(&self, location: Location) {
        let seq = self.begin_fetch();

        let result = tokio::try_join!(
            self.provider.current_by_coords(location),
            self.provider.forecast_by_coords(location),
        );

        match result {
            Ok((current, forecast)) => {
                self.commit_success(seq, current, forecast.list, location).await;
            }
            Err(err) => self.commit_failure(seq, &err),
        }
    }

    /// Fetch by city name; the resolved coordinates come from the
    /// current-weather response itself.
    pub async fn fetch_by_city(&self, city: &str) {
        let seq = self.begin_fetch();

        let result = tokio::try_join!(
            self.provider.current_by_city(city),
            self.provider.forecast_by_city(city),
        );

        match result {
            Ok((current, forecast)) => {
                let location = Location::from(current.coord);
                self.commit_success(seq, current, forecast.list, location).await;
            }
            Err(err) => self.commit_failure(seq, &err),
        }
    }

    /// Resolve the device location, then fetch for it. A geolocation failure
    /// surfaces as `Failed` without touching the network.
    pub async fn fetch_by_current_location(&self) {
        let seq = self.begin_fetch();

        match self.locator.current_location().await {
            Ok(location) => self.fetch_by_location(location).await,
            Err(err) => self.commit_failure(seq, &WeatherError::Location(err)),
        }
    }

    /// Re-fetch with whatever identity is already established: city name if
    /// known, otherwise coordinates. No-op when neither exists.
    pub async fn refresh(&self) {
        let (city, location) = {
            let state = self.state();
            (state.city_name, state.location)
        };

        if !city.is_empty() {
            self.fetch_by_city(&city).await;
        } else if let Some(location) = location {
            self.fetch_by_location(location).await;
        }
    }

    pub fn clear_error(&self) {
        self.update_state(|state| WeatherState { error: None, ..state });
    }

    fn begin_fetch(&self) -> u64 {
        let seq = self.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.update_state(|state| WeatherState { loading: true, error: None, ..state });
        seq
    }

    fn is_latest(&self, seq: u64) -> bool {
        self.fetch_seq.load(Ordering::SeqCst) == seq
    }

    async fn commit_success(
        &self,
        seq: u64,
        current: CurrentWeather,
        samples: Vec<ForecastSample>,
        location: Location,
    ) {
        if !self.is_latest(seq) {
            tracing::debug!(seq, "dropping stale fetch result");
            return;
        }

        let snapshot = CachedWeather {
            city_name: current.name.clone(),
            current,
            samples,
            location: Some(location),
            last_updated_ms: now_millis(),
        };

        let next = snapshot.clone();
        self.replace_state(WeatherState {
            current: Some(next.current),
            samples: next.samples,
            location: next.location,
            city_name: next.city_name,
            loading: false,
            error: None,
            last_updated_ms: Some(next.last_updated_ms),
        });

        // State first, persistence after: a failed write is logged inside
        // the cache and never reverts what the user already sees.
        self.cache.save(&snapshot).await;
    }

    fn commit_failure(&self, seq: u64, err: &WeatherError) {
        if !self.is_latest(seq) {
            tracing::debug!(seq, "dropping stale fetch error");
            return;
        }

        tracing::warn!(error = %err, "weather fetch failed");
        self.update_state(|state| WeatherState {
            loading: false,
            error: Some(err.to_string()),
            ..state
        });
    }

    fn replace_state(&self, next: WeatherState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = next;
    }

    fn update_state(&self, transition: impl FnOnce(WeatherState) -> WeatherState) {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let next = transition(guard.clone());
        *guard = next;
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
