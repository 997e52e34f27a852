//! Weather Aggregation Module
//!
//! [`WeatherService`] drives the pipeline for one request: places are
//! resolved, then either the current conditions of every place are fetched
//! concurrently, or the seven-day forecast of a single place is fetched and
//! rendered into charts.

use crate::chart::{ChartSet, ForecastChartRenderer};
use crate::config::WeatherBoardConfig;
use crate::error::ErrorKind;
use crate::geocoding::{Geocoder, GeocodingMatch, OpenWeatherMapGeocoder};
use crate::location_resolver::LocationResolver;
use crate::models::{Coordinates, CurrentWeather, Forecast, KnownCity, Place};
use crate::upstream;
use crate::weather::{WeatherApiClient, WeatherProvider};
use crate::{Result, WeatherBoardError};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Most places one current-weather request may name
pub const MAX_PLACES: usize = 20;

/// Places resolved and fetched at the same time
const PLACE_CONCURRENCY: usize = 5;

/// Current conditions for one requested place, or why they are missing
#[derive(Debug, Clone, Serialize)]
pub struct PlaceReport {
    /// The place as the caller requested it
    pub place: String,
    #[serde(flatten)]
    pub outcome: PlaceOutcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlaceOutcome {
    Ok { weather: CurrentWeather },
    Failed { kind: ErrorKind, message: String },
}

impl PlaceReport {
    fn ok(place: String, weather: CurrentWeather) -> Self {
        Self {
            place,
            outcome: PlaceOutcome::Ok { weather },
        }
    }

    fn failed(place: String, error: &WeatherBoardError) -> Self {
        Self {
            place,
            outcome: PlaceOutcome::Failed {
                kind: error.kind(),
                message: error.to_string(),
            },
        }
    }

    #[must_use]
    pub fn weather(&self) -> Option<&CurrentWeather> {
        match &self.outcome {
            PlaceOutcome::Ok { weather } => Some(weather),
            PlaceOutcome::Failed { .. } => None,
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.weather().is_some()
    }
}

/// Forecast for a single place with its rendered charts
#[derive(Debug, Clone, Serialize)]
pub struct ForecastReport {
    pub coordinates: Coordinates,
    pub forecast: Forecast,
    pub charts: ChartSet,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregatedResult {
    /// One report per requested place, in request order
    Current(Vec<PlaceReport>),
    Forecast(ForecastReport),
}

/// Orchestrates resolution, fetching and chart rendering
pub struct WeatherService {
    resolver: LocationResolver,
    geocoder: Arc<dyn Geocoder>,
    weather: Arc<dyn WeatherProvider>,
    charts: ForecastChartRenderer,
    search_limit: u32,
}

impl WeatherService {
    /// Build the service with the real provider clients
    pub fn new(config: &WeatherBoardConfig) -> Result<Self> {
        let client = upstream::build_client(config.upstream_timeout())?;
        let geocoder = Arc::new(OpenWeatherMapGeocoder::new(
            client.clone(),
            &config.geocoding,
        ));
        let weather = Arc::new(WeatherApiClient::new(client, &config.weather));

        info!(
            "Weather service ready (timeout {}s, search limit {})",
            config.weather.timeout_seconds, config.geocoding.search_limit
        );
        Ok(Self::with_providers(
            geocoder,
            weather,
            config.geocoding.search_limit,
        ))
    }

    /// Build the service around arbitrary providers
    pub fn with_providers(
        geocoder: Arc<dyn Geocoder>,
        weather: Arc<dyn WeatherProvider>,
        search_limit: u32,
    ) -> Self {
        Self {
            resolver: LocationResolver::new(geocoder.clone()),
            geocoder,
            weather,
            charts: ForecastChartRenderer::default(),
            search_limit,
        }
    }

    /// The places shown when nothing was requested
    #[must_use]
    pub fn default_places() -> Vec<Place> {
        KnownCity::ALL.into_iter().map(Place::Known).collect()
    }

    /// Run the pipeline for `places`.
    ///
    /// Without a forecast every place is reported on its own, a failing place
    /// does not fail the others. A forecast needs exactly one place.
    pub async fn aggregate(
        &self,
        places: &[Place],
        include_forecast: bool,
    ) -> Result<AggregatedResult> {
        if include_forecast {
            let [place] = places else {
                return Err(WeatherBoardError::validation(format!(
                    "a forecast needs exactly one place, got {}",
                    places.len()
                )));
            };
            return Ok(AggregatedResult::Forecast(self.forecast(place).await?));
        }

        if places.is_empty() {
            return Err(WeatherBoardError::validation("no places requested"));
        }
        if places.len() > MAX_PLACES {
            return Err(WeatherBoardError::validation(format!(
                "at most {MAX_PLACES} places per request, got {}",
                places.len()
            )));
        }
        Ok(AggregatedResult::Current(self.current_weather(places).await))
    }

    /// Current conditions for every place, a bounded number at a time, in
    /// input order
    pub async fn current_weather(&self, places: &[Place]) -> Vec<PlaceReport> {
        debug!("Fetching current weather for {} places", places.len());
        let reports: Vec<PlaceReport> = stream::iter(places)
            .map(|place| self.report_for(place))
            .boxed()
            .buffered(PLACE_CONCURRENCY)
            .collect()
            .await;

        let failed = reports.iter().filter(|report| !report.is_ok()).count();
        if failed > 0 {
            warn!("{} of {} places failed", failed, reports.len());
        }
        reports
    }

    async fn report_for(&self, place: &Place) -> PlaceReport {
        let label = place.label();
        match self.fetch_current(place).await {
            Ok(weather) => PlaceReport::ok(label, weather),
            Err(e) => {
                warn!("Current weather for '{}' failed: {}", label, e);
                PlaceReport::failed(label, &e)
            }
        }
    }

    async fn fetch_current(&self, place: &Place) -> Result<CurrentWeather> {
        let coords = self.resolver.resolve(place).await?;
        self.weather.current(&coords).await
    }

    /// Seven-day forecast and charts for one place
    #[instrument(skip(self, place), fields(place = %place))]
    pub async fn forecast(&self, place: &Place) -> Result<ForecastReport> {
        let coordinates = self.resolver.resolve(place).await?;
        let forecast = self.weather.forecast(&coordinates).await?;
        let charts = self.charts.summarize(&forecast)?;

        Ok(ForecastReport {
            coordinates,
            forecast,
            charts,
        })
    }

    /// Free-text location search, best matches first
    pub async fn search(&self, text: &str) -> Result<Vec<GeocodingMatch>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(WeatherBoardError::validation("search text cannot be empty"));
        }

        let matches = self.geocoder.geocode(text, self.search_limit).await?;
        info!("Search '{}' returned {} matches", text, matches.len());
        Ok(matches)
    }
}
