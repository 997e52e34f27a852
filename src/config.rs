//! Configuration management for weatherboard
//!
//! Provider URLs and keys come from a TOML file, `WEATHERBOARD__*` environment
//! variables, or the legacy `WEATHERAPI_*` / `OPENWEATHERMAP_*` variables.
//! The resulting struct is built once at startup and passed by reference.

use crate::{Result, WeatherBoardError};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherBoardConfig {
    /// Weather provider settings
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Geocoding provider settings
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Weather provider (WeatherAPI) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL, `current.json` and `forecast.json` are appended to it
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Provider key, sent as the `key` query parameter
    #[serde(default)]
    pub api_key: String,
    /// Timeout applied to every upstream request
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Geocoding provider (OpenWeatherMap) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Full URL of the direct geocoding endpoint
    #[serde(default = "default_geocoding_url")]
    pub url: String,
    /// Provider key, sent as the `appid` query parameter
    #[serde(default)]
    pub api_key: String,
    /// Maximum number of matches returned by a location search
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_weather_base_url() -> String {
    "https://api.weatherapi.com/v1".to_string()
}

fn default_geocoding_url() -> String {
    "https://api.openweathermap.org/geo/1.0/direct".to_string()
}

fn default_timeout() -> u32 {
    10
}

fn default_search_limit() -> u32 {
    10
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            api_key: String::new(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            url: default_geocoding_url(),
            api_key: String::new(),
            search_limit: default_search_limit(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Plain environment variables accepted alongside `WEATHERBOARD__*`, mapped to config keys
const LEGACY_ENV_VARS: [(&str, &str); 4] = [
    ("WEATHERAPI_URL", "weather.base_url"),
    ("WEATHERAPI_KEY", "weather.api_key"),
    ("OPENWEATHERMAP_GEO_URL", "geocoding.url"),
    ("OPENWEATHERMAP_KEY", "geocoding.api_key"),
];

impl WeatherBoardConfig {
    /// Load configuration from `weatherboard.toml` (if present) and the environment
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from the given TOML file and the environment
    pub fn load_from_path(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        // an explicitly named file must exist, the default one is optional
        let (config_file, required) = match config_path {
            Some(path) => (path, true),
            None => (Path::new("weatherboard.toml"), false),
        };
        builder = builder.add_source(
            File::from(config_file)
                .required(required)
                .format(FileFormat::Toml),
        );

        builder = builder.add_source(
            Environment::with_prefix("WEATHERBOARD")
                .separator("__")
                .try_parsing(true),
        );

        for (var, key) in LEGACY_ENV_VARS {
            let value = env::var(var).ok().filter(|v| !v.trim().is_empty());
            builder = builder
                .set_override_option(key, value)
                .map_err(|e| WeatherBoardError::config(e.to_string()))?;
        }

        let config: WeatherBoardConfig = builder
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| WeatherBoardError::config(format!("Failed to build configuration: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Timeout applied to every upstream request
    #[must_use]
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.weather.timeout_seconds.into())
    }

    /// Budget for a whole API request: resolution and fetch run back to back
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.upstream_timeout() * 2 + Duration::from_secs(5)
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_urls()?;
        self.validate_numeric_ranges()?;
        self.validate_logging()?;
        Ok(())
    }

    /// Keys are opaque, they only have to be present
    pub fn validate_api_keys(&self) -> Result<()> {
        if self.weather.api_key.trim().is_empty() {
            return Err(WeatherBoardError::config(
                "Weather API key is missing. Set WEATHERAPI_KEY or weather.api_key.",
            ));
        }
        if self.geocoding.api_key.trim().is_empty() {
            return Err(WeatherBoardError::config(
                "Geocoding API key is missing. Set OPENWEATHERMAP_KEY or geocoding.api_key.",
            ));
        }
        Ok(())
    }

    fn validate_urls(&self) -> Result<()> {
        for (name, value) in [
            ("weather.base_url", &self.weather.base_url),
            ("geocoding.url", &self.geocoding.url),
        ] {
            let parsed = url::Url::parse(value).map_err(|e| {
                WeatherBoardError::config(format!("{name} is not a valid URL ({value}): {e}"))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(WeatherBoardError::config(format!(
                    "{name} must be an HTTP or HTTPS URL, got: {value}"
                )));
            }
        }
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds == 0 || self.weather.timeout_seconds > 300 {
            return Err(WeatherBoardError::config(
                "Upstream timeout must be between 1 and 300 seconds",
            ));
        }
        if self.geocoding.search_limit == 0 || self.geocoding.search_limit > 50 {
            return Err(WeatherBoardError::config(
                "Search limit must be between 1 and 50",
            ));
        }
        Ok(())
    }

    fn validate_logging(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WeatherBoardError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WeatherBoardError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }
        Ok(())
    }
}
