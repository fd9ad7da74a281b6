// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Forward geocoding: convert free-text place names to coordinates.
//! Uses Nominatim (OpenStreetMap) - free, no API key required.

use crate::config::UpstreamConfig;
use crate::constants::endpoints;
use crate::logging::AppLogger;
use crate::models::GeocodedLocation;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Geocoding errors
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("No results for location query: {0}")]
    NotFound(String),

    #[error("Geocoder returned status {0}")]
    UpstreamStatus(reqwest::StatusCode),

    #[error("Malformed coordinate in geocoder response: {0}")]
    BadCoordinate(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    location: GeocodedLocation,
    fetched_at: Instant,
}

/// Forward geocoder with an in-process memo of recent lookups
pub struct GeocodingService {
    client: Client,
    base_url: String,
    cache: RwLock<HashMap<String, CacheEntry>>,
    cache_ttl: Duration,
}

impl GeocodingService {
    pub fn new(config: &UpstreamConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent(config.user_agent.clone())
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: config.nominatim_base_url.clone(),
            cache: RwLock::new(HashMap::new()),
            cache_ttl: Duration::from_secs(24 * 60 * 60),
        }
    }

    /// Resolve a place name to coordinates
    pub async fn geocode(&self, query: &str) -> Result<GeocodedLocation, GeocodeError> {
        let cache_key = query.trim().to_lowercase();

        // Check cache first
        {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(&cache_key) {
                if entry.fetched_at.elapsed() < self.cache_ttl {
                    debug!("Using cached geocode result for {}", cache_key);
                    AppLogger::log_geocode_event(query, true, true);
                    return Ok(entry.location.clone());
                }
            }
        }

        info!("Geocoding location: {}", query);

        let url = format!(
            "{}{}?q={}&format=json&limit=1",
            self.base_url,
            endpoints::NOMINATIM_SEARCH_PATH,
            urlencoding::encode(query.trim())
        );

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            AppLogger::log_geocode_event(query, false, false);
            return Err(GeocodeError::UpstreamStatus(response.status()));
        }

        let places: Vec<NominatimPlace> = response.json().await?;
        let location = location_from_places(query, places)?;

        {
            let mut cache = self.cache.write().await;
            cache.insert(
                cache_key,
                CacheEntry {
                    location: location.clone(),
                    fetched_at: Instant::now(),
                },
            );
        }

        AppLogger::log_geocode_event(query, true, false);
        info!(
            "Geocoded '{}' to ({:.4}, {:.4})",
            query, location.latitude, location.longitude
        );
        Ok(location)
    }
}

/// Pick the best match out of a Nominatim search response
fn location_from_places(
    query: &str,
    places: Vec<NominatimPlace>,
) -> Result<GeocodedLocation, GeocodeError> {
    let place = places
        .into_iter()
        .next()
        .ok_or_else(|| GeocodeError::NotFound(query.to_string()))?;

    let latitude: f64 = place
        .lat
        .parse()
        .map_err(|_| GeocodeError::BadCoordinate(place.lat.clone()))?;
    let longitude: f64 = place
        .lon
        .parse()
        .map_err(|_| GeocodeError::BadCoordinate(place.lon.clone()))?;

    Ok(GeocodedLocation {
        latitude,
        longitude,
        display_name: place.display_name,
    })
}
