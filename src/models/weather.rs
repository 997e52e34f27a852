//! Current weather conditions for one place

use serde::{Deserialize, Serialize};

/// Normalized current-conditions record
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentWeather {
    /// Place name as reported by the provider
    pub city: String,
    /// Temperature in Celsius
    pub temperature_c: f64,
    pub wind: Wind,
    pub condition: Condition,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Wind {
    /// Wind speed in miles per hour
    pub speed_mph: f64,
    /// Compass direction, e.g. "WSW"
    pub direction: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Condition {
    /// Human-readable description of weather conditions
    pub text: String,
    /// Absolute `https://` URL of the condition icon
    pub icon_url: String,
}

impl CurrentWeather {
    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:.1}°C", self.temperature_c)
    }

    /// Format wind information
    #[must_use]
    pub fn format_wind(&self) -> String {
        format!("{:.1} mph {}", self.wind.speed_mph, self.wind.direction)
    }
}
