//! Core library for the `lynx` weather CLI.
//!
//! This crate defines:
//! - Validated location queries and the weather observation model
//! - A provider abstraction with a classified error taxonomy, plus the
//!   OpenWeather implementation
//! - Rule tables deriving clothing and activity suggestions
//! - "Latest request wins" coordination for overlapping fetches
//!
//! It never reads or writes persistent storage; configuration and saved
//! preferences belong to the caller.

pub mod error;
pub mod location;
pub mod model;
pub mod provider;
pub mod recommend;
pub mod supersede;

pub use error::{CREDENTIAL_DOCS_URL, LocationError, QueryError, WeatherError};
pub use location::{FixedLocation, LocationSource, NoLocation, query_from_source};
pub use model::{
    ApiKey, CityName, ConditionCategory, Coordinates, LocationQuery, Preferences, Suggestion,
    Theme, WeatherObservation,
};
pub use provider::{FetchOptions, OpenWeatherProvider, WeatherProvider};
pub use recommend::suggest;
pub use supersede::{LatestOnly, Outcome};
