//! Geocoding module
//!
//! Provides forward/reverse geocoding, device position sources, and the
//! `LocationResolver` that combines them.

pub mod device;
pub mod ip_location;
pub mod nominatim;
pub mod resolver;

#[cfg(test)]
pub(crate) mod fake;

use crate::config::Config;
use crate::coord::GeoPoint;
use crate::error::Result;
use serde::{Deserialize, Serialize};

pub use device::{ConfiguredPosition, DeniedPosition, DevicePositionSource, FixedPosition};
pub use nominatim::NominatimBackend;
pub use resolver::LocationResolver;

/// Resolver backed by Nominatim and the configured device source
pub type LiveResolver = LocationResolver<NominatimBackend, ConfiguredPosition>;

/// Build the resolver described by `config`
pub fn resolver_from_config(config: &Config) -> Result<LiveResolver> {
    Ok(LocationResolver::new(
        NominatimBackend::new(&config.geocoder)?,
        ConfiguredPosition::from_config(config)?,
        config.device_timeout(),
    ))
}

/// An address, optionally paired with its coordinate
///
/// A location without a point is raw user typing. A location whose address
/// is the formatted coordinate had no readable name available.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResolvedLocation {
    /// Human-readable address
    pub address: String,
    /// Coordinate, if resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point: Option<GeoPoint>,
}

impl ResolvedLocation {
    /// A resolved address with its coordinate
    pub fn new(address: impl Into<String>, point: GeoPoint) -> Self {
        Self {
            address: address.into(),
            point: Some(point),
        }
    }

    /// Typed text with no coordinate yet
    pub fn typed(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            point: None,
        }
    }

    /// A coordinate labelled with its own `"lat, lng"` text
    pub fn fallback(point: GeoPoint) -> Self {
        Self {
            address: point.to_string(),
            point: Some(point),
        }
    }

    /// True when both an address and a coordinate are present
    pub fn is_complete(&self) -> bool {
        !self.address.trim().is_empty() && self.point.is_some()
    }
}

/// A forward-geocoding match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoMatch {
    pub point: GeoPoint,
    pub display_name: String,
}

/// Trait for geocoding backends
pub trait GeoBackend: Send + Sync {
    /// Geocode a location string to its top-ranked match
    ///
    /// Returns None if the provider has no results
    fn geocode(&self, query: &str) -> impl std::future::Future<Output = Result<Option<GeoMatch>>> + Send;

    /// Reverse geocode a coordinate to a display name
    ///
    /// Returns None if the provider has no name for it
    fn reverse_geocode(&self, point: GeoPoint) -> impl std::future::Future<Output = Result<Option<String>>> + Send;
}
