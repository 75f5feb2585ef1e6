//! Debounced search-as-you-type city suggestions.
//!
//! Each keystroke calls [`SuggestionSearch::query`]; the lookup only fires
//! after a quiet period, and a newer query supersedes any pending one. A
//! superseded query's result is discarded even when its response arrives
//! after the newer query has already started: last-write-wins follows query
//! recency, not response arrival order.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::model::CitySuggestion;
use crate::provider::GeocodingProvider;

pub const DEBOUNCE_QUIET_PERIOD: Duration = Duration::from_millis(400);
pub const SUGGESTION_LIMIT: usize = 5;

#[derive(Debug, Clone)]
pub struct SuggestionSearch {
    geocoder: Arc<dyn GeocodingProvider>,
    quiet_period: Duration,
    generation: Arc<AtomicU64>,
}

impl SuggestionSearch {
    pub fn new(geocoder: Arc<dyn GeocodingProvider>) -> Self {
        Self::with_quiet_period(geocoder, DEBOUNCE_QUIET_PERIOD)
    }

    pub fn with_quiet_period(geocoder: Arc<dyn GeocodingProvider>, quiet_period: Duration) -> Self {
        Self { geocoder, quiet_period, generation: Arc::new(AtomicU64::new(0)) }
    }

    /// Returns `None` when a newer query superseded this one. Lookup
    /// failures degrade to an empty suggestion list, silently.
    pub async fn query(&self, input: &str) -> Option<Vec<CitySuggestion>> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        tokio::time::sleep(self.quiet_period).await;
        if self.generation.load(Ordering::SeqCst) != ticket {
            return None;
        }

        let suggestions = match self.geocoder.city_suggestions(input, SUGGESTION_LIMIT).await {
            Ok(suggestions) => suggestions,
            Err(error) => {
                tracing::debug!(%error, "suggestion lookup failed");
                Vec::new()
            }
        };

        if self.generation.load(Ordering::SeqCst) != ticket {
            return None;
        }
        Some(suggestions)
    }
}
