//! Where coordinates come from when the caller has no explicit query.

use async_trait::async_trait;

use crate::{
    error::LocationError,
    model::{Coordinates, LocationQuery},
};

#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn locate(&self) -> Result<Coordinates, LocationError>;
}

/// A location known ahead of time, e.g. a configured home.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

#[async_trait]
impl LocationSource for FixedLocation {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

/// No positioning available on this host.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

#[async_trait]
impl LocationSource for NoLocation {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::Unavailable)
    }
}

/// Turn a location source into a query. Failing here means no fetch happens.
pub async fn query_from_source(
    source: &dyn LocationSource,
) -> Result<LocationQuery, LocationError> {
    source.locate().await.map(LocationQuery::from)
}
