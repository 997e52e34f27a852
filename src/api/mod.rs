use std::sync::Arc;

use axum::{
    Form, Router,
    extract::{
        Query, State,
        rejection::{FormRejection, QueryRejection},
    },
    response::Json,
    routing::{get, post},
};
use serde::Deserialize;
use tracing::debug;

use crate::aggregator::{AggregatedResult, WeatherService};
use crate::geocoding::GeocodingMatch;
use crate::models::{Coordinates, Place};
use crate::WeatherBoardError;

mod error;

pub use error::{ApiError, ErrorBody, timeout_as_error};

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Default, Deserialize)]
pub struct WeatherParams {
    /// Comma-separated place names, the default cities when absent
    pub cities: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ForecastParams {
    pub lat: Option<String>,
    pub long: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search: String,
}

impl WeatherParams {
    fn places(&self) -> Vec<Place> {
        match &self.cities {
            None => WeatherService::default_places(),
            Some(cities) => cities
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(Place::parse)
                .collect(),
        }
    }
}

impl ForecastParams {
    fn place(&self) -> Result<Place, WeatherBoardError> {
        match (&self.lat, &self.long, &self.city) {
            (Some(lat), Some(long), None) => Ok(Place::Coordinates(Coordinates::parse(lat, long)?)),
            (None, None, Some(city)) => Ok(Place::parse(city)),
            (None, None, None) => Err(WeatherBoardError::validation(
                "either lat and long or city is required",
            )),
            (_, _, Some(_)) => Err(WeatherBoardError::validation(
                "lat/long and city cannot be combined",
            )),
            _ => Err(WeatherBoardError::validation(
                "lat and long must be given together",
            )),
        }
    }
}

pub fn router(service: Arc<WeatherService>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/weather", get(get_weather))
        .route("/forecast", get(get_forecast))
        .route("/search", post(search))
        .with_state(service)
}

async fn health() -> Json<&'static str> {
    Json("ok")
}

async fn get_weather(
    State(service): State<Arc<WeatherService>>,
    params: Result<Query<WeatherParams>, QueryRejection>,
) -> ApiResult<AggregatedResult> {
    let Query(params) = params?;
    let places = params.places();
    debug!("Current weather requested for {} places", places.len());
    Ok(Json(service.aggregate(&places, false).await?))
}

async fn get_forecast(
    State(service): State<Arc<WeatherService>>,
    params: Result<Query<ForecastParams>, QueryRejection>,
) -> ApiResult<AggregatedResult> {
    let Query(params) = params?;
    let place = params.place()?;
    Ok(Json(service.aggregate(&[place], true).await?))
}

async fn search(
    State(service): State<Arc<WeatherService>>,
    form: Result<Form<SearchForm>, FormRejection>,
) -> ApiResult<Vec<GeocodingMatch>> {
    let Form(form) = form?;
    Ok(Json(service.search(&form.search).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KnownCity;

    #[test]
    fn test_missing_cities_means_defaults() {
        let places = WeatherParams::default().places();
        assert_eq!(places, WeatherService::default_places());
    }

    #[test]
    fn test_cities_are_split_and_parsed() {
        let params = WeatherParams {
            cities: Some("Berlin, Paris,,Tokyo ".to_string()),
        };
        assert_eq!(
            params.places(),
            vec![
                Place::Known(KnownCity::Berlin),
                Place::Query("Paris".to_string()),
                Place::Known(KnownCity::Tokyo),
            ]
        );
    }

    #[test]
    fn test_forecast_params() {
        let params = ForecastParams {
            lat: Some("46.8182".to_string()),
            long: Some("8.2275".to_string()),
            city: None,
        };
        assert!(matches!(params.place(), Ok(Place::Coordinates(_))));

        let params = ForecastParams {
            city: Some("Paris".to_string()),
            ..ForecastParams::default()
        };
        assert_eq!(params.place().unwrap(), Place::Query("Paris".to_string()));
    }

    #[test]
    fn test_forecast_params_rejections() {
        let non_numeric = ForecastParams {
            lat: Some("north".to_string()),
            long: Some("8.2".to_string()),
            city: None,
        };
        let half = ForecastParams {
            lat: Some("46.8".to_string()),
            ..ForecastParams::default()
        };
        let both = ForecastParams {
            lat: Some("46.8".to_string()),
            long: Some("8.2".to_string()),
            city: Some("Bern".to_string()),
        };

        for params in [ForecastParams::default(), non_numeric, half, both] {
            assert!(matches!(
                params.place(),
                Err(WeatherBoardError::Validation { .. })
            ));
        }
    }
}
