use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::{error::QueryError, recommend};

/// A validated latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    lat: f64,
    lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Result<Self, QueryError> {
        // `contains` is false for NaN, so non-finite input is rejected too.
        if !(-90.0..=90.0).contains(&lat) {
            return Err(QueryError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(QueryError::LongitudeOutOfRange(lon));
        }
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

/// A trimmed, non-empty place name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityName(String);

impl CityName {
    pub fn new(value: &str) -> Result<Self, QueryError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(QueryError::EmptyCityName);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// What to fetch weather for. Only constructible from valid parts.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Coordinates(Coordinates),
    CityName(CityName),
}

impl LocationQuery {
    pub fn coordinates(lat: f64, lon: f64) -> Result<Self, QueryError> {
        Coordinates::new(lat, lon).map(LocationQuery::Coordinates)
    }

    pub fn city(name: &str) -> Result<Self, QueryError> {
        CityName::new(name).map(LocationQuery::CityName)
    }
}

impl From<Coordinates> for LocationQuery {
    fn from(value: Coordinates) -> Self {
        LocationQuery::Coordinates(value)
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationQuery::Coordinates(c) => write!(f, "{:.4},{:.4}", c.lat, c.lon),
            LocationQuery::CityName(name) => f.write_str(name.as_str()),
        }
    }
}

/// Opaque provider credential. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(value: &str) -> Result<Self, QueryError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(QueryError::EmptyApiKey);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// A single point-in-time reading for a place.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherObservation {
    pub temperature_celsius: f64,
    /// Primary category label from the provider, e.g. "Rain" or "Clear".
    pub condition: String,
    pub description: String,
    pub feels_like_celsius: f64,
    pub place_name: String,
    pub country_code: String,
    pub humidity_pct: Option<u8>,
    pub wind_speed_mps: Option<f64>,
    pub observed_at: DateTime<Utc>,
}

impl WeatherObservation {
    /// Suggestions for this reading. Recomputed on every call.
    pub fn suggestion(&self) -> Suggestion {
        recommend::suggest(self.temperature_celsius, &self.condition)
    }

    pub fn category(&self) -> ConditionCategory {
        ConditionCategory::from_label(&self.condition)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub clothing: String,
    pub activity: String,
}

/// Known provider condition categories. Anything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionCategory {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Fog,
    Other,
}

impl ConditionCategory {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Clear" => Self::Clear,
            "Clouds" => Self::Clouds,
            "Rain" => Self::Rain,
            "Drizzle" => Self::Drizzle,
            "Thunderstorm" => Self::Thunderstorm,
            "Snow" => Self::Snow,
            "Mist" => Self::Mist,
            "Fog" => Self::Fog,
            _ => Self::Other,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Clear => "☀️",
            Self::Clouds => "☁️",
            Self::Rain => "🌧️",
            Self::Drizzle => "🌦️",
            Self::Thunderstorm => "⛈️",
            Self::Snow => "❄️",
            Self::Mist | Self::Fog => "🌫️",
            Self::Other => "🌤️",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Real,
    Cyberpunk,
    Retro90s,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Real => "real",
            Theme::Cyberpunk => "cyberpunk",
            Theme::Retro90s => "retro90s",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Theme::Real => "🌤️",
            Theme::Cyberpunk => "🌌",
            Theme::Retro90s => "🎮",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "real" => Ok(Theme::Real),
            "cyberpunk" => Ok(Theme::Cyberpunk),
            "retro90s" | "retro-90s" => Ok(Theme::Retro90s),
            _ => Err(format!(
                "Unknown theme '{s}'. Supported themes: real, cyberpunk, retro90s."
            )),
        }
    }
}

/// UI preferences, handed in and out by the front end. The core never
/// stores them anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
    pub saved_outfit: Option<String>,
}

impl Preferences {
    pub fn with_theme(self, theme: Theme) -> Self {
        Self { theme, ..self }
    }

    pub fn with_saved_outfit(self, suggestion: &Suggestion) -> Self {
        Self {
            saved_outfit: Some(suggestion.clothing.clone()),
            ..self
        }
    }
}
