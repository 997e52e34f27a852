//! Places and geographic coordinates

use crate::{Result, WeatherBoardError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Validated latitude/longitude pair in decimal degrees
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Create coordinates, rejecting values outside [-90,90] x [-180,180]
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(WeatherBoardError::validation(format!(
                "Latitude must be between -90 and 90, got: {latitude}"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherBoardError::validation(format!(
                "Longitude must be between -180 and 180, got: {longitude}"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parse raw request parameters such as `lat=51.5&long=-0.12`
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self> {
        let lat = latitude.trim().parse::<f64>().map_err(|_| {
            WeatherBoardError::validation(format!("Latitude is not a number: '{latitude}'"))
        })?;
        let lon = longitude.trim().parse::<f64>().map_err(|_| {
            WeatherBoardError::validation(format!("Longitude is not a number: '{longitude}'"))
        })?;
        Self::new(lat, lon)
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Provider query form, `"lat,lon"`
    #[must_use]
    pub fn to_query(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Cities with pre-resolved coordinates; these never hit the geocoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownCity {
    Berlin,
    London,
    LosAngeles,
    NewYork,
    Tokyo,
}

impl KnownCity {
    pub const ALL: [KnownCity; 5] = [
        KnownCity::Berlin,
        KnownCity::London,
        KnownCity::LosAngeles,
        KnownCity::NewYork,
        KnownCity::Tokyo,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Berlin => "Berlin",
            Self::London => "London",
            Self::LosAngeles => "Los Angeles",
            Self::NewYork => "New York",
            Self::Tokyo => "Tokyo",
        }
    }

    /// (latitude, longitude)
    #[must_use]
    pub fn lat_lon(self) -> (f64, f64) {
        match self {
            Self::Berlin => (52.517_036_5, 13.388_859_9),
            Self::London => (51.507_321_9, -0.127_647_4),
            Self::LosAngeles => (34.053_690_9, -118.242_766),
            Self::NewYork => (40.712_728_1, -74.006_015_2),
            Self::Tokyo => (35.682_838_7, 139.759_454_9),
        }
    }

    #[must_use]
    pub fn coordinates(self) -> Coordinates {
        let (latitude, longitude) = self.lat_lon();
        Coordinates {
            latitude,
            longitude,
        }
    }

    /// Exact, case-sensitive lookup by display name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|city| city.name() == name)
    }
}

impl fmt::Display for KnownCity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KnownCity {
    type Err = WeatherBoardError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s.trim())
            .ok_or_else(|| WeatherBoardError::validation(format!("Not a known city: '{s}'")))
    }
}

/// A requested location in exactly one of its accepted forms
#[derive(Debug, Clone, PartialEq)]
pub enum Place {
    Known(KnownCity),
    Query(String),
    Coordinates(Coordinates),
}

impl Place {
    /// Known city names map to [`Place::Known`], anything else is a free-form query
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        match KnownCity::from_name(input) {
            Some(city) => Self::Known(city),
            None => Self::Query(input.to_string()),
        }
    }

    /// Label used to identify this place in reports and errors
    #[must_use]
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(city) => write!(f, "{city}"),
            Self::Query(text) => f.write_str(text),
            Self::Coordinates(coords) => write!(f, "{coords}"),
        }
    }
}

impl From<KnownCity> for Place {
    fn from(city: KnownCity) -> Self {
        Self::Known(city)
    }
}

impl From<Coordinates> for Place {
    fn from(coords: Coordinates) -> Self {
        Self::Coordinates(coords)
    }
}
