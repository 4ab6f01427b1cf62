//! Output formatters
//!
//! Provides trait-based output formatting for ride requests.

pub mod gpx;
pub mod json;
pub mod text;
pub mod url;

use crate::config::Config;
use crate::error::Result;
use crate::sim::RideRequest;
use serde::{Deserialize, Serialize};

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// Trait for output formatters
pub trait RideFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Format a ride request
    ///
    /// `config` supplies the map URL providers.
    fn format(&self, ride: &RideRequest, config: &Config) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn RideFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        "gpx" => Some(Box::new(gpx::GpxFormatter)),
        "url" => Some(Box::new(url::UrlFormatter)),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    ["json", "text", "gpx", "url"]
        .into_iter()
        .filter_map(get_formatter)
        .map(|f| FormatInfo {
            name: f.name().to_string(),
            description: f.description().to_string(),
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn sample_ride() -> RideRequest {
    use crate::coord::GeoPoint;

    RideRequest::new(
        "Tahrir Square, Cairo",
        GeoPoint::new(30.0444, 31.2357).unwrap(),
        "Ramses Station, Cairo",
        GeoPoint::new(30.0626, 31.2497).unwrap(),
        20,
    )
}
