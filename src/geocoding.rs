//! Geocoding: free-text place names to coordinates
//!
//! [`Geocoder`] is the capability the resolver and the search operation depend
//! on; [`OpenWeatherMapGeocoder`] implements it against the OpenWeatherMap
//! direct geocoding API.

use crate::config::GeocodingConfig;
use crate::models::Coordinates;
use crate::upstream;
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

pub const PROVIDER: &str = "geocoding";

/// One geocoding match
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GeocodingMatch {
    /// Location name
    pub name: String,
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lon: f64,
    /// Country code
    #[serde(default)]
    pub country: Option<String>,
    /// State (for US locations)
    #[serde(default)]
    pub state: Option<String>,
}

impl GeocodingMatch {
    pub fn coordinates(&self) -> Result<Coordinates> {
        Coordinates::new(self.lat, self.lon)
    }

    /// "Springfield, Illinois, US"
    #[must_use]
    pub fn display_name(&self) -> String {
        [Some(self.name.as_str()), self.state.as_deref(), self.country.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Look up `query`, returning at most `limit` matches, best first.
    /// An empty list means no match.
    async fn geocode(&self, query: &str, limit: u32) -> Result<Vec<GeocodingMatch>>;
}

/// OpenWeatherMap direct geocoding client
pub struct OpenWeatherMapGeocoder {
    client: Client,
    url: String,
    api_key: String,
}

impl OpenWeatherMapGeocoder {
    #[must_use]
    pub fn new(client: Client, config: &GeocodingConfig) -> Self {
        Self {
            client,
            url: config.url.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl Geocoder for OpenWeatherMapGeocoder {
    #[instrument(skip(self))]
    async fn geocode(&self, query: &str, limit: u32) -> Result<Vec<GeocodingMatch>> {
        info!("Geocoding location: '{}'", query);
        let limit = limit.to_string();

        let matches: Vec<GeocodingMatch> = upstream::get_json(
            &self.client,
            PROVIDER,
            &self.url,
            &[
                ("q", query),
                ("limit", limit.as_str()),
                ("appid", self.api_key.as_str()),
            ],
        )
        .await?;

        debug!(
            "Geocoding results: {:?}",
            matches
                .iter()
                .map(|m| format!("{} ({:.4}, {:.4})", m.name, m.lat, m.lon))
                .collect::<Vec<_>>()
        );
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::build_client;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn geocoder(server: &MockServer) -> OpenWeatherMapGeocoder {
        let config = GeocodingConfig {
            url: format!("{}/geo/1.0/direct", server.uri()),
            api_key: "geo-key".to_string(),
            search_limit: 10,
        };
        OpenWeatherMapGeocoder::new(build_client(Duration::from_secs(2)).unwrap(), &config)
    }

    #[tokio::test]
    async fn test_geocode_sends_query_limit_and_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .and(query_param("q", "Paris"))
            .and(query_param("limit", "1"))
            .and(query_param("appid", "geo-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"name": "Paris", "local_names": {"fr": "Paris"}, "lat": 48.8588897, "lon": 2.3200410, "country": "FR", "state": "Ile-de-France"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let matches = geocoder(&server).geocode("Paris", 1).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Paris");
        assert_eq!(matches[0].lat, 48.8588897);
        assert_eq!(matches[0].display_name(), "Paris, Ile-de-France, FR");
    }

    #[tokio::test]
    async fn test_geocode_empty_result_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let matches = geocoder(&server).geocode("Nowhere", 1).await.unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_geocode_rejects_missing_coordinates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!([{"name": "Paris"}])),
            )
            .mount(&server)
            .await;

        let err = geocoder(&server).geocode("Paris", 1).await.unwrap_err();
        assert!(matches!(err, crate::WeatherBoardError::Upstream { .. }));
    }

    #[test]
    fn test_match_coordinates_are_validated() {
        let m = GeocodingMatch {
            name: "Broken".to_string(),
            lat: 123.0,
            lon: 0.0,
            country: None,
            state: None,
        };
        assert!(m.coordinates().is_err());
        assert_eq!(m.display_name(), "Broken");
    }
}
