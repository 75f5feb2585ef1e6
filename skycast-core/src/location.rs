//! Device-location seam.
//!
//! Real geolocation is an external collaborator supplied by the host
//! platform; the crate only ships a static implementation for CLI flags,
//! configured home coordinates, and tests.

use async_trait::async_trait;

use crate::error::LocationError;
use crate::model::Location;

/// Yields a single position fix, or a typed permission/timeout failure.
#[async_trait]
pub trait LocationProvider: Send + Sync + std::fmt::Debug {
    async fn current_location(&self) -> Result<Location, LocationError>;
}

/// Always reports the location it was constructed with.
#[derive(Debug, Clone)]
pub struct StaticLocation(pub Location);

#[async_trait]
impl LocationProvider for StaticLocation {
    async fn current_location(&self) -> Result<Location, LocationError> {
        Ok(self.0)
    }
}

/// Collaborator for environments without any location source.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

#[async_trait]
impl LocationProvider for NoLocation {
    async fn current_location(&self) -> Result<Location, LocationError> {
        Err(LocationError::ServiceUnavailable)
    }
}
