use crate::{
    error::WeatherError,
    model::{LocationQuery, WeatherObservation},
};
use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A source of current weather.
///
/// Each call issues exactly one request and classifies the outcome; nothing
/// is cached or retried, so concurrent calls never interfere.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(&self, query: &LocationQuery) -> Result<WeatherObservation, WeatherError>;
}

/// Per-provider transport settings.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Upper bound on the whole request; expiry is reported as a network failure.
    pub timeout: Duration,
    /// Overrides the provider's default endpoint host.
    pub base_url: Option<String>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            base_url: None,
        }
    }
}

impl FetchOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}
