use thiserror::Error;

/// Where users can obtain or check an OpenWeather API key.
pub const CREDENTIAL_DOCS_URL: &str = "https://openweathermap.org/appid";

/// Outcome of a failed fetch. Every variant is terminal for that attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    #[error("Invalid API key.")]
    Unauthorized,

    #[error("Location not found.")]
    NotFound,

    #[error("Failed to fetch weather data. Check your connection.")]
    NetworkFailure,

    #[error("Weather API error: {0}")]
    UpstreamError(String),
}

impl WeatherError {
    pub(crate) fn malformed() -> Self {
        WeatherError::UpstreamError("malformed response".to_string())
    }

    /// True when the caller should point the user at credential docs.
    pub fn is_credential_problem(&self) -> bool {
        matches!(self, WeatherError::Unauthorized)
    }
}

/// Rejected input when building a query or credential.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("latitude {0} is outside -90..=90")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside -180..=180")]
    LongitudeOutOfRange(f64),

    #[error("city name must not be empty")]
    EmptyCityName,

    #[error("API key must not be empty")]
    EmptyApiKey,
}

/// The device location could not be determined; no fetch was attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Location permission denied. Please enable location services.")]
    PermissionDenied,

    #[error("Unable to get your location. Pass a city or coordinates instead.")]
    Unavailable,
}
