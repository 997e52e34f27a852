//! Data models for weatherboard
//!
//! This module contains the request-scoped value types organized by concern:
//! - Location: places, known cities and validated coordinates
//! - Weather: current conditions for one place
//! - Forecast: the seven-day forecast series

pub mod forecast;
pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use forecast::{FORECAST_DAYS, Forecast, ForecastDay};
pub use location::{Coordinates, KnownCity, Place};
pub use weather::{Condition, CurrentWeather, Wind};
