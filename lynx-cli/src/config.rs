use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use lynx_core::{
    ApiKey, Coordinates, FetchOptions, FixedLocation, LocationSource, NoLocation, Preferences,
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Environment variable that takes precedence over the stored API key.
pub const API_KEY_ENV: &str = "LYNX_API_KEY";

/// A saved "home" position used when `show` gets no city or coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HomeLocation {
    pub lat: f64,
    pub lon: f64,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// timeout_secs = 10
///
/// [home]
/// lat = 51.5
/// lon = -0.12
///
/// [preferences]
/// theme = "cyberpunk"
/// saved_outfit = "Light jacket, long sleeves, jeans"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
    pub home: Option<HomeLocation>,
    #[serde(default)]
    pub preferences: Preferences,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "lynx-weather", "lynx")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Validate and store an API key.
    pub fn set_api_key(&mut self, raw: &str) -> Result<()> {
        ApiKey::new(raw).context("Refusing to store an empty API key")?;
        self.api_key = Some(raw.trim().to_string());
        Ok(())
    }

    /// API key from `env_value` if set, otherwise from the file.
    pub fn resolve_api_key(&self, env_value: Option<String>) -> Result<ApiKey> {
        let raw = env_value
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.api_key.clone())
            .ok_or_else(|| {
                anyhow!(
                    "No API key configured.\n\
                     Hint: run `lynx configure` or set {API_KEY_ENV}."
                )
            })?;

        ApiKey::new(&raw).context("Configured API key is invalid")
    }

    pub fn set_home(&mut self, coords: Coordinates) {
        self.home = Some(HomeLocation {
            lat: coords.lat(),
            lon: coords.lon(),
        });
    }

    /// Fallback position for `show` when no explicit location is given.
    pub fn location_source(&self) -> Result<Box<dyn LocationSource>> {
        match self.home {
            Some(home) => {
                let coords = Coordinates::new(home.lat, home.lon)
                    .context("Configured home location is invalid")?;
                Ok(Box::new(FixedLocation(coords)))
            }
            None => Ok(Box::new(NoLocation)),
        }
    }

    /// Transport options, with `override_secs` taking precedence over the file.
    pub fn fetch_options(&self, override_secs: Option<u64>) -> FetchOptions {
        let options = FetchOptions::default();
        match override_secs.or(self.timeout_secs) {
            Some(secs) => options.with_timeout(Duration::from_secs(secs)),
            None => options,
        }
    }
}
