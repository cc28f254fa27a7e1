//! Human-friendly output formatting.

use lynx_core::{CREDENTIAL_DOCS_URL, Preferences, WeatherError, WeatherObservation};

/// Whole degrees, rounding halves away from zero.
fn degrees(celsius: f64) -> i64 {
    celsius.round() as i64
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn observation(obs: &WeatherObservation, prefs: &Preferences) -> String {
    let suggestion = obs.suggestion();

    let mut lines = vec![
        format!("{} LynxWeather", prefs.theme.emoji()),
        format!(
            "{} {}°C  {}",
            obs.category().emoji(),
            degrees(obs.temperature_celsius),
            capitalize(&obs.description)
        ),
        format!("{}, {}", obs.place_name, obs.country_code),
        format!("Feels like {}°C", degrees(obs.feels_like_celsius)),
    ];

    let mut extras = Vec::new();
    if let Some(humidity) = obs.humidity_pct {
        extras.push(format!("Humidity {humidity}%"));
    }
    if let Some(wind) = obs.wind_speed_mps {
        extras.push(format!("Wind {wind} m/s"));
    }
    if !extras.is_empty() {
        lines.push(extras.join("  "));
    }
    lines.push(format!("Observed {}", obs.observed_at.format("%Y-%m-%d %H:%M UTC")));

    lines.push(String::new());
    lines.push(format!("What to wear: {}", suggestion.clothing));
    lines.push(format!("What to do:   {}", suggestion.activity));
    if let Some(saved) = &prefs.saved_outfit {
        lines.push(format!("Saved outfit: {saved}"));
    }

    lines.join("\n")
}

/// One message per error kind; credential errors add where to get a key.
pub fn weather_error(err: &WeatherError) -> String {
    if err.is_credential_problem() {
        format!("{err}\nGet a valid key here: {CREDENTIAL_DOCS_URL}")
    } else {
        err.to_string()
    }
}

pub fn preferences(prefs: &Preferences) -> String {
    let outfit = prefs.saved_outfit.as_deref().unwrap_or("(none)");
    format!("Theme: {} {}\nSaved outfit: {outfit}", prefs.theme.emoji(), prefs.theme)
}
