//! Seven-day forecast model

use crate::{Result, WeatherBoardError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of days requested per forecast call
pub const FORECAST_DAYS: usize = 7;

/// One day of a forecast
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastDay {
    pub date: NaiveDate,
    /// Average temperature in Celsius
    pub avg_temp_c: f64,
    /// Chance of rain, 0-100
    pub chance_of_rain_pct: u8,
}

/// Exactly [`FORECAST_DAYS`] days in strictly ascending date order
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(transparent)]
pub struct Forecast {
    days: Vec<ForecastDay>,
}

impl Forecast {
    pub fn new(days: Vec<ForecastDay>) -> Result<Self> {
        if days.len() != FORECAST_DAYS {
            return Err(WeatherBoardError::validation(format!(
                "Forecast must contain {FORECAST_DAYS} days, got {}",
                days.len()
            )));
        }

        if let Some(pair) = days.windows(2).find(|pair| pair[0].date >= pair[1].date) {
            return Err(WeatherBoardError::validation(format!(
                "Forecast days out of order: {} is followed by {}",
                pair[0].date, pair[1].date
            )));
        }

        if let Some(day) = days.iter().find(|day| day.chance_of_rain_pct > 100) {
            return Err(WeatherBoardError::validation(format!(
                "Chance of rain on {} is {}%, must be at most 100%",
                day.date, day.chance_of_rain_pct
            )));
        }

        if let Some(day) = days.iter().find(|day| !day.avg_temp_c.is_finite()) {
            return Err(WeatherBoardError::validation(format!(
                "Average temperature on {} is not a number",
                day.date
            )));
        }

        Ok(Self { days })
    }

    #[must_use]
    pub fn days(&self) -> &[ForecastDay] {
        &self.days
    }

    #[must_use]
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.days.iter().map(|day| day.date).collect()
    }

    /// Lowest and highest average temperature
    #[must_use]
    pub fn temperature_bounds(&self) -> (f64, f64) {
        self.days.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(min, max), day| (min.min(day.avg_temp_c), max.max(day.avg_temp_c)),
        )
    }
}

#[cfg(test)]
pub(crate) fn sample_days(start: NaiveDate) -> Vec<ForecastDay> {
    (0..FORECAST_DAYS)
        .map(|offset| ForecastDay {
            date: start + chrono::Days::new(offset as u64),
            avg_temp_c: 10.0 + offset as f64 * 1.5,
            chance_of_rain_pct: (offset * 12) as u8,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_valid_forecast() {
        let forecast = Forecast::new(sample_days(start())).unwrap();
        assert_eq!(forecast.days().len(), FORECAST_DAYS);
        assert_eq!(forecast.dates()[0], start());
        assert_eq!(forecast.temperature_bounds(), (10.0, 19.0));
    }

    #[test]
    fn test_wrong_day_count() {
        let mut days = sample_days(start());
        days.pop();
        let err = Forecast::new(days).unwrap_err();
        assert!(err.to_string().contains("must contain 7 days, got 6"));
    }

    #[test]
    fn test_out_of_order_days() {
        let mut days = sample_days(start());
        days.swap(2, 3);
        assert!(Forecast::new(days).is_err());
    }

    #[test]
    fn test_duplicate_dates_rejected() {
        let mut days = sample_days(start());
        days[4].date = days[3].date;
        assert!(Forecast::new(days).is_err());
    }

    #[test]
    fn test_rain_percentage_range() {
        let mut days = sample_days(start());
        days[0].chance_of_rain_pct = 101;
        assert!(Forecast::new(days).is_err());
    }

    #[test]
    fn test_serializes_as_list() {
        let forecast = Forecast::new(sample_days(start())).unwrap();
        let json = serde_json::to_value(&forecast).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 7);
        assert_eq!(json[0]["date"], "2026-10-18");
    }
}
