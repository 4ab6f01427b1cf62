//! Nominatim geocoding backend (OpenStreetMap)
//!
//! Uses the free Nominatim API for geocoding.
//! Rate limit: 1 request per second, and an identifying User-Agent is required.

use crate::config::GeocoderConfig;
use crate::coord::GeoPoint;
use crate::error::{Error, Result};
use crate::geo::{GeoBackend, GeoMatch};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Nominatim geocoding backend
#[derive(Debug, Clone)]
pub struct NominatimBackend {
    client: reqwest::Client,
    base_url: String,
}

/// Nominatim search response item
#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    display_name: String,
}

/// Nominatim reverse response
///
/// Unknown coordinates come back as `{"error": "..."}` with status 200.
#[derive(Debug, Deserialize)]
struct ReverseResult {
    display_name: Option<String>,
    error: Option<String>,
}

impl NominatimBackend {
    /// Create a backend from the geocoder settings
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Parse lat/lng strings to a point
    fn parse_coords(lat: &str, lng: &str) -> Result<GeoPoint> {
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| Error::Geocoding(format!("Invalid latitude: {}", lat)))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|_| Error::Geocoding(format!("Invalid longitude: {}", lng)))?;
        GeoPoint::new(lat, lng)
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search?format=json&q={}&addressdetails=1&limit=1",
            self.base_url,
            urlencoding::encode(query)
        )
    }

    fn reverse_url(&self, point: GeoPoint) -> String {
        format!(
            "{}/reverse?format=json&lat={}&lon={}&addressdetails=1",
            self.base_url,
            point.lat(),
            point.lng()
        )
    }
}

impl GeoBackend for NominatimBackend {
    async fn geocode(&self, query: &str) -> Result<Option<GeoMatch>> {
        let url = self.search_url(query);
        debug!(%url, "nominatim search");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Geocoding(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Geocoding(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        let results: Vec<SearchResult> = response
            .json()
            .await
            .map_err(|e| Error::Geocoding(format!("Failed to parse Nominatim response: {}", e)))?;

        match results.into_iter().next() {
            Some(result) => {
                let point = Self::parse_coords(&result.lat, &result.lon)?;
                Ok(Some(GeoMatch {
                    point,
                    display_name: result.display_name,
                }))
            }
            None => Ok(None),
        }
    }

    async fn reverse_geocode(&self, point: GeoPoint) -> Result<Option<String>> {
        let url = self.reverse_url(point);
        debug!(%url, "nominatim reverse");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Geocoding(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            if response.status() == reqwest::StatusCode::NOT_FOUND {
                return Ok(None);
            }
            return Err(Error::Geocoding(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        let result: ReverseResult = response
            .json()
            .await
            .map_err(|e| Error::Geocoding(format!("Failed to parse Nominatim response: {}", e)))?;

        if let Some(reason) = result.error {
            debug!(%reason, "nominatim has no name for point");
        }

        Ok(result.display_name.filter(|name| !name.trim().is_empty()))
    }
}
