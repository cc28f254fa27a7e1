use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    error::WeatherError,
    model::{ApiKey, LocationQuery, WeatherObservation},
};

use super::{FetchOptions, WeatherProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

/// OpenWeather "current weather" client. Always requests metric units.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: ApiKey,
    endpoint: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: ApiKey, options: FetchOptions) -> reqwest::Result<Self> {
        let http = Client::builder().timeout(options.timeout).build()?;
        let base = options.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let endpoint = format!("{}{CURRENT_WEATHER_PATH}", base.trim_end_matches('/'));

        Ok(Self {
            api_key,
            endpoint,
            http,
        })
    }

    fn query_params(&self, query: &LocationQuery) -> Vec<(&'static str, String)> {
        let mut params = match query {
            LocationQuery::Coordinates(c) => {
                vec![("lat", c.lat().to_string()), ("lon", c.lon().to_string())]
            }
            LocationQuery::CityName(name) => vec![("q", name.as_str().to_string())],
        };
        params.push(("units", "metric".to_string()));
        params.push(("appid", self.api_key.expose().to_string()));
        params
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch(&self, query: &LocationQuery) -> Result<WeatherObservation, WeatherError> {
        debug!(%query, endpoint = %self.endpoint, "requesting current weather");

        let res = self
            .http
            .get(&self.endpoint)
            .query(&self.query_params(query))
            .send()
            .await
            .map_err(transport_failure)?;

        let status = res.status();
        if let Some(err) = status_error(status) {
            // The body adds nothing here, so a broken one must not hide the status.
            debug!(%status, "OpenWeather rejected the request");
            return Err(err);
        }

        let body = if status.is_success() {
            res.text().await.map_err(transport_failure)?
        } else {
            res.text().await.unwrap_or_else(|err| {
                warn!(error = %err, %status, "failed to read OpenWeather error body");
                String::new()
            })
        };

        debug!(%status, bytes = body.len(), "OpenWeather responded");
        classify(status, &body)
    }
}

fn transport_failure(err: reqwest::Error) -> WeatherError {
    warn!(error = %err, timeout = err.is_timeout(), "OpenWeather request failed in transport");
    WeatherError::NetworkFailure
}

/// Map a completed HTTP exchange to an observation or a typed error.
fn classify(status: StatusCode, body: &str) -> Result<WeatherObservation, WeatherError> {
    if status.is_success() {
        return parse_observation(body);
    }

    if let Some(err) = status_error(status) {
        return Err(err);
    }

    let message =
        error_message(body).unwrap_or_else(|| format!("unexpected status {}", status.as_u16()));
    Err(WeatherError::UpstreamError(message))
}

/// Statuses classified without looking at the body.
fn status_error(status: StatusCode) -> Option<WeatherError> {
    match status {
        StatusCode::UNAUTHORIZED => Some(WeatherError::Unauthorized),
        StatusCode::NOT_FOUND => Some(WeatherError::NotFound),
        _ => None,
    }
}

fn parse_observation(body: &str) -> Result<WeatherObservation, WeatherError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body).map_err(|err| {
        warn!(error = %err, body = %truncate_body(body), "malformed OpenWeather body");
        WeatherError::malformed()
    })?;

    let Some(weather) = parsed.weather.into_iter().next() else {
        warn!("OpenWeather body has an empty `weather` array");
        return Err(WeatherError::malformed());
    };

    let observed_at = parsed.dt.and_then(unix_to_utc).unwrap_or_else(Utc::now);

    Ok(WeatherObservation {
        temperature_celsius: parsed.main.temp,
        condition: weather.main,
        description: weather.description,
        feels_like_celsius: parsed.main.feels_like,
        place_name: parsed.name,
        country_code: parsed.sys.country,
        humidity_pct: parsed.main.humidity,
        wind_speed_mps: parsed.wind.and_then(|w| w.speed),
        observed_at,
    })
}

fn error_message(body: &str) -> Option<String> {
    let parsed: OwErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: Option<i64>,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: Option<OwWind>,
    sys: OwSys,
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: Option<String>,
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
