//! `weatherboard` - current weather and forecast charts for any place
//!
//! This library resolves known cities, free-text searches and raw coordinates
//! to coordinates, fetches current conditions and seven-day forecasts from the
//! weather provider, and renders forecasts into inline charts.

pub mod aggregator;
pub mod api;
pub mod chart;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod location_resolver;
pub mod logging;
pub mod models;
pub mod upstream;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use aggregator::{AggregatedResult, ForecastReport, PlaceOutcome, PlaceReport, WeatherService};
pub use chart::{ChartArtifact, ChartSet, ForecastChartRenderer};
pub use config::WeatherBoardConfig;
pub use error::{ErrorKind, WeatherBoardError};
pub use geocoding::{Geocoder, GeocodingMatch, OpenWeatherMapGeocoder};
pub use location_resolver::LocationResolver;
pub use models::{Coordinates, CurrentWeather, Forecast, ForecastDay, KnownCity, Place};
pub use weather::{WeatherApiClient, WeatherProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherBoardError>;
