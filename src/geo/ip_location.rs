//! IP-based device position
//!
//! Uses ip-api.com to approximate the device position on hosts without a
//! location sensor. Every call asks for a fresh fix; nothing is cached.

use crate::constants::api::IP_API_URL;
use crate::coord::GeoPoint;
use crate::error::{PositionError, Result};
use crate::geo::device::DevicePositionSource;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

/// Position source backed by ip-api.com
#[derive(Debug, Clone)]
pub struct IpPositionSource {
    client: reqwest::Client,
    url: String,
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    message: Option<String>,
}

impl IpPositionSource {
    /// Create a source against the public ip-api.com endpoint
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_url(IP_API_URL, timeout)
    }

    /// Create a source against a specific endpoint
    pub fn with_url(url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Turn an ip-api body into a point
    fn parse_fix(data: IpApiResponse) -> std::result::Result<GeoPoint, PositionError> {
        if data.status != "success" {
            warn!(message = ?data.message, "IP location lookup failed");
            return Err(PositionError::PositionUnavailable);
        }

        let (Some(lat), Some(lng)) = (data.lat, data.lon) else {
            return Err(PositionError::PositionUnavailable);
        };
        GeoPoint::new(lat, lng).map_err(|_| PositionError::PositionUnavailable)
    }
}

impl DevicePositionSource for IpPositionSource {
    async fn current_position(&self) -> std::result::Result<GeoPoint, PositionError> {
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            if e.is_timeout() {
                PositionError::Timeout
            } else {
                warn!(error = %e, "IP location request failed");
                PositionError::PositionUnavailable
            }
        })?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "IP location API returned an error status");
            return Err(PositionError::PositionUnavailable);
        }

        let data: IpApiResponse = response
            .json()
            .await
            .map_err(|_| PositionError::PositionUnavailable)?;

        Self::parse_fix(data)
    }
}
