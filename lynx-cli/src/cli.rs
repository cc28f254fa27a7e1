use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use lynx_core::{
    Coordinates, LocationQuery, OpenWeatherProvider, Theme, WeatherProvider, query_from_source,
};
use tracing::info;

use crate::{
    config::{API_KEY_ENV, Config},
    render,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "lynx",
    version,
    about = "Current weather with outfit and activity suggestions"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and optional defaults.
    Configure {
        /// Home latitude, used when `show` gets no location.
        #[arg(long, requires = "home_lon", allow_hyphen_values = true)]
        home_lat: Option<f64>,

        /// Home longitude, used when `show` gets no location.
        #[arg(long, requires = "home_lat", allow_hyphen_values = true)]
        home_lon: Option<f64>,

        /// Default request timeout in seconds.
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Show current weather and suggestions.
    Show {
        /// City name; falls back to coordinates or the configured home.
        city: Option<String>,

        #[arg(long, requires = "lon", conflicts_with = "city", allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", conflicts_with = "city", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Request timeout in seconds for this call.
        #[arg(long)]
        timeout: Option<u64>,

        /// Remember the clothing suggestion as the saved outfit.
        #[arg(long)]
        save_outfit: bool,
    },

    /// Set the display theme: real, cyberpunk or retro90s.
    Theme { theme: Theme },

    /// Print saved preferences.
    Prefs,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure {
                home_lat,
                home_lon,
                timeout,
            } => configure(home_lat.zip(home_lon), timeout),
            Command::Show {
                city,
                lat,
                lon,
                timeout,
                save_outfit,
            } => show(city, lat.zip(lon), timeout, save_outfit).await,
            Command::Theme { theme } => {
                let mut config = Config::load()?;
                config.preferences = config.preferences.with_theme(theme);
                config.save()?;
                println!("Theme set to {} {theme}", theme.emoji());
                Ok(())
            }
            Command::Prefs => {
                let config = Config::load()?;
                println!("{}", render::preferences(&config.preferences));
                Ok(())
            }
        }
    }
}

fn configure(home: Option<(f64, f64)>, timeout: Option<u64>) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Get one at https://openweathermap.org/appid")
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(&key)?;

    if let Some((lat, lon)) = home {
        config.set_home(Coordinates::new(lat, lon)?);
    }
    if timeout.is_some() {
        config.timeout_secs = timeout;
    }

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

async fn show(
    city: Option<String>,
    coords: Option<(f64, f64)>,
    timeout: Option<u64>,
    save_outfit: bool,
) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    let api_key = config.resolve_api_key(std::env::var(API_KEY_ENV).ok())?;

    let query = match (city, coords) {
        (Some(city), _) => LocationQuery::city(&city)?,
        (None, Some((lat, lon))) => LocationQuery::coordinates(lat, lon)?,
        (None, None) => {
            let source = config.location_source()?;
            query_from_source(source.as_ref()).await?
        }
    };

    let provider = OpenWeatherProvider::new(api_key, config.fetch_options(timeout))
        .context("Failed to build HTTP client")?;

    info!(%query, "fetching current weather");
    let result = tokio::select! {
        result = provider.fetch(&query) => result,
        _ = tokio::signal::ctrl_c() => bail!("Cancelled."),
    };

    let observation = match result {
        Ok(observation) => observation,
        Err(err) => bail!("{}", render::weather_error(&err)),
    };

    if save_outfit {
        config.preferences = config.preferences.with_saved_outfit(&observation.suggestion());
        config.save()?;
    }

    println!("{}", render::observation(&observation, &config.preferences));
    Ok(())
}
