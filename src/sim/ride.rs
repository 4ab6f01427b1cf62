//! Ride request
//!
//! The record produced when a booking is confirmed: both ends, the route
//! the marker will follow, and the ride card details.

use crate::coord::GeoPoint;
use crate::geo::ResolvedLocation;
use crate::sim::RoutePlan;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ride card details
///
/// These are fixed placeholders. Nothing here is computed from the route;
/// use `RideRequest::distance_meters` for the actual straight-line length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideDetails {
    pub captain: String,
    pub vehicle: String,
    pub plate: String,
    pub rating: f64,
    pub arrival: String,
    pub estimated_time: String,
    pub distance: String,
    pub status: String,
}

impl Default for RideDetails {
    fn default() -> Self {
        Self {
            captain: "Captain Ahmed".to_string(),
            vehicle: "Toyota Corolla".to_string(),
            plate: "ABC 1234".to_string(),
            rating: 4.8,
            arrival: "2 min away".to_string(),
            estimated_time: "12 min".to_string(),
            distance: "5.2 km".to_string(),
            status: "Captain is on the way to pickup location".to_string(),
        }
    }
}

/// A confirmed ride
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RideRequest {
    /// Unique ID for this ride
    pub id: String,
    /// When the ride was requested (RFC 3339)
    pub requested_at: DateTime<Utc>,
    pub pickup: ResolvedLocation,
    pub destination: ResolvedLocation,
    pub route: RoutePlan,
    pub details: RideDetails,
}

impl RideRequest {
    /// Build a ride between two labelled points
    pub fn new(
        pickup_address: impl Into<String>,
        pickup: GeoPoint,
        destination_address: impl Into<String>,
        destination: GeoPoint,
        segments: usize,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            requested_at: Utc::now(),
            pickup: ResolvedLocation::new(pickup_address, pickup),
            destination: ResolvedLocation::new(destination_address, destination),
            route: RoutePlan::new(pickup, destination, segments),
            details: RideDetails::default(),
        }
    }

    /// Straight-line route length in meters
    pub fn distance_meters(&self) -> f64 {
        self.route.length_meters()
    }
}
