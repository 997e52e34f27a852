//! `WeatherAPI` response structures and conversion into internal models
//!
//! Every field the pipeline reads is non-optional here, so an absent or
//! mistyped field fails deserialization instead of becoming a default.

use super::{PROVIDER, normalize_icon_url};
use crate::models::{Condition, CurrentWeather, Forecast, ForecastDay, Wind};
use crate::{Result, WeatherBoardError};
use chrono::NaiveDate;
use serde::Deserialize;

/// `current.json` response
#[derive(Debug, Deserialize)]
pub struct CurrentResponse {
    pub location: LocationBlock,
    pub current: CurrentBlock,
}

#[derive(Debug, Deserialize)]
pub struct LocationBlock {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CurrentBlock {
    pub temp_c: f64,
    pub wind_mph: f64,
    pub wind_dir: String,
    pub condition: ConditionBlock,
}

#[derive(Debug, Deserialize)]
pub struct ConditionBlock {
    pub text: String,
    pub icon: String,
}

/// `forecast.json` response, only the daily aggregates are read
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub forecast: ForecastBlock,
}

#[derive(Debug, Deserialize)]
pub struct ForecastBlock {
    pub forecastday: Vec<ForecastDayBlock>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastDayBlock {
    pub date: String,
    pub day: DayBlock,
}

#[derive(Debug, Deserialize)]
pub struct DayBlock {
    pub avgtemp_c: f64,
    pub daily_chance_of_rain: Percentage,
}

/// The provider has sent percentages both as numbers and as numeric strings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Percentage {
    Number(f64),
    Text(String),
}

impl Percentage {
    fn to_pct(&self) -> Option<u8> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        if value.fract() == 0.0 && (0.0..=100.0).contains(&value) {
            Some(value as u8)
        } else {
            None
        }
    }
}

impl CurrentResponse {
    pub fn into_current_weather(self) -> Result<CurrentWeather> {
        let CurrentResponse { location, current } = self;
        if location.name.trim().is_empty() {
            return Err(WeatherBoardError::upstream(
                PROVIDER,
                "location.name is empty",
            ));
        }

        Ok(CurrentWeather {
            city: location.name,
            temperature_c: current.temp_c,
            wind: Wind {
                speed_mph: current.wind_mph,
                direction: current.wind_dir,
            },
            condition: Condition {
                icon_url: normalize_icon_url(&current.condition.icon)?,
                text: current.condition.text,
            },
        })
    }
}

impl ForecastResponse {
    pub fn into_forecast(self) -> Result<Forecast> {
        let days = self
            .forecast
            .forecastday
            .into_iter()
            .map(ForecastDayBlock::into_day)
            .collect::<Result<Vec<_>>>()?;

        Forecast::new(days).map_err(|e| {
            WeatherBoardError::upstream(PROVIDER, format!("unusable forecast: {e}"))
        })
    }
}

impl ForecastDayBlock {
    fn into_day(self) -> Result<ForecastDay> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").map_err(|e| {
            WeatherBoardError::upstream(
                PROVIDER,
                format!("invalid forecast date '{}': {e}", self.date),
            )
        })?;

        let chance_of_rain_pct = self.day.daily_chance_of_rain.to_pct().ok_or_else(|| {
            WeatherBoardError::upstream(
                PROVIDER,
                format!(
                    "daily_chance_of_rain for {date} is not a percentage: {:?}",
                    self.day.daily_chance_of_rain
                ),
            )
        })?;

        Ok(ForecastDay {
            date,
            avg_temp_c: self.day.avgtemp_c,
            chance_of_rain_pct,
        })
    }
}
