//! Geographic coordinates
//!
//! This module handles:
//! - The validated `GeoPoint` type shared by every component
//! - Linear interpolation between points
//! - Straight-line (haversine) distances

pub mod distance;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated geographic coordinate (latitude, longitude)
///
/// Latitude is within [-90, 90] and longitude within [-180, 180]. The fields
/// are private so a `GeoPoint` can only exist in a valid state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPoint")]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct RawPoint {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawPoint> for GeoPoint {
    type Error = Error;

    fn try_from(raw: RawPoint) -> Result<Self> {
        GeoPoint::new(raw.lat, raw.lng)
    }
}

impl GeoPoint {
    /// Create a point, rejecting out-of-range or non-finite values
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                lat
            )));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                lng
            )));
        }
        Ok(Self { lat, lng })
    }

    /// Latitude in degrees
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees
    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Point at fraction `t` of the way from `self` to `other`
    ///
    /// `t` is expected in [0, 1]; the endpoints are returned exactly.
    pub fn lerp(&self, other: &GeoPoint, t: f64) -> GeoPoint {
        if t <= 0.0 {
            return *self;
        }
        if t >= 1.0 {
            return *other;
        }
        // Convex combination of two in-range values stays in range.
        GeoPoint {
            lat: self.lat + (other.lat - self.lat) * t,
            lng: self.lng + (other.lng - self.lng) * t,
        }
    }
}

/// Formats as `"{lat}, {lng}"`, the address used when no name is known
impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.lat, self.lng)
    }
}
