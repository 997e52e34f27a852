//! Current conditions and forecasts from the weather provider

use crate::config::WeatherConfig;
use crate::models::{Coordinates, CurrentWeather, FORECAST_DAYS, Forecast};
use crate::upstream;
use crate::{Result, WeatherBoardError};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, instrument};

pub mod weatherapi;

pub const PROVIDER: &str = "weatherapi";

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current conditions at `coords`
    async fn current(&self, coords: &Coordinates) -> Result<CurrentWeather>;

    /// Seven-day forecast at `coords`, in provider (chronological) order
    async fn forecast(&self, coords: &Coordinates) -> Result<Forecast>;
}

/// Client for the WeatherAPI `current.json` and `forecast.json` endpoints
pub struct WeatherApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherApiClient {
    #[must_use]
    pub fn new(client: Client, config: &WeatherConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiClient {
    #[instrument(skip(self, coords), fields(coords = %coords))]
    async fn current(&self, coords: &Coordinates) -> Result<CurrentWeather> {
        let url = format!("{}/current.json", self.base_url);
        let query = coords.to_query();

        let response: weatherapi::CurrentResponse = upstream::get_json(
            &self.client,
            PROVIDER,
            &url,
            &[("q", query.as_str()), ("key", self.api_key.as_str())],
        )
        .await?;

        let weather = response.into_current_weather()?;
        info!(
            "Current weather for {}: {}",
            weather.city,
            weather.format_temperature()
        );
        Ok(weather)
    }

    #[instrument(skip(self, coords), fields(coords = %coords))]
    async fn forecast(&self, coords: &Coordinates) -> Result<Forecast> {
        let url = format!("{}/forecast.json", self.base_url);
        let query = coords.to_query();
        let days = FORECAST_DAYS.to_string();

        let response: weatherapi::ForecastResponse = upstream::get_json(
            &self.client,
            PROVIDER,
            &url,
            &[
                ("q", query.as_str()),
                ("days", days.as_str()),
                ("key", self.api_key.as_str()),
            ],
        )
        .await?;

        let forecast = response.into_forecast()?;
        info!("Retrieved forecast with {} days", forecast.days().len());
        Ok(forecast)
    }
}

/// Rewrite a provider icon reference to an absolute `https://` URL.
///
/// Accepts protocol-relative (`//host/p`), `http://`, `https://` and bare
/// (`host/p`) forms.
pub fn normalize_icon_url(raw: &str) -> Result<String> {
    let raw = raw.trim();
    let rest = raw
        .strip_prefix("https://")
        .or_else(|| raw.strip_prefix("http://"))
        .unwrap_or_else(|| raw.trim_start_matches('/'));

    if rest.is_empty() {
        return Err(WeatherBoardError::upstream(
            PROVIDER,
            "condition icon is empty",
        ));
    }

    let icon_url = format!("https://{rest}");
    let parsed = url::Url::parse(&icon_url).map_err(|e| {
        WeatherBoardError::upstream(PROVIDER, format!("invalid icon URL '{raw}': {e}"))
    })?;
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(WeatherBoardError::upstream(
            PROVIDER,
            format!("icon URL '{raw}' has no host"),
        ));
    }

    Ok(icon_url)
}
