//! Location Resolution Module
//!
//! Resolves a [`Place`] into [`Coordinates`]. Known cities and explicit
//! coordinates never touch the network; everything else goes through the
//! [`Geocoder`] with a single-result lookup.

use crate::geocoding::Geocoder;
use crate::models::{Coordinates, KnownCity, Place};
use crate::{Result, WeatherBoardError};
use std::sync::Arc;
use tracing::debug;

/// Service for resolving places to coordinates
#[derive(Clone)]
pub struct LocationResolver {
    geocoder: Arc<dyn Geocoder>,
}

impl LocationResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self { geocoder }
    }

    /// Resolve a place into coordinates
    pub async fn resolve(&self, place: &Place) -> Result<Coordinates> {
        debug!("Resolving place: {:?}", place);

        let coords = match place {
            Place::Known(city) => city.coordinates(),
            Place::Coordinates(coords) => *coords,
            Place::Query(text) => match KnownCity::from_name(text.trim()) {
                Some(city) => city.coordinates(),
                None => self.resolve_name(text).await?,
            },
        };

        debug!("Resolved '{}' to ({})", place, coords);
        Ok(coords)
    }

    /// Geocode free text, taking the best match
    async fn resolve_name(&self, name: &str) -> Result<Coordinates> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WeatherBoardError::resolution(name, "location cannot be empty"));
        }

        debug!("Geocoding location name: {}", name);
        let matches = self
            .geocoder
            .geocode(name, 1)
            .await
            .map_err(|e| WeatherBoardError::resolution(name, e.to_string()))?;

        let Some(best) = matches.first() else {
            return Err(WeatherBoardError::resolution(name, "no matching location found"));
        };

        debug!(
            "Found location: {} ({:.4}, {:.4})",
            best.name, best.lat, best.lon
        );
        best.coordinates()
            .map_err(|e| WeatherBoardError::resolution(name, e.to_string()))
    }
}
