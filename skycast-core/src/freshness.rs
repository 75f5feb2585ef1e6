//! Staleness policy for cached weather data.

use std::time::Duration;

/// Cached data older than this must be refetched rather than reused.
pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// True while the cached timestamp is within `ttl` of `now_ms`.
///
/// This only gates whether the startup cache read may populate state without
/// a network call; an explicit refresh or search always refetches.
pub fn is_fresh(last_updated_ms: i64, now_ms: i64, ttl: Duration) -> bool {
    let age_ms = i128::from(now_ms) - i128::from(last_updated_ms);
    age_ms < ttl.as_millis() as i128
}
