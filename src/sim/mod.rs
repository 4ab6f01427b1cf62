//! Route simulation
//!
//! This module handles:
//! - Building the straight-line route between pickup and destination
//! - Stepping a marker along that route on a timer
//! - The ride request shown once a booking is confirmed

pub mod cursor;
pub mod ride;
pub mod simulator;

use crate::coord::distance::path_length;
use crate::constants::sim::MAX_SEGMENTS;
use crate::coord::GeoPoint;
use serde::{Deserialize, Serialize};

pub use cursor::{SimSnapshot, SimState, SimulationCursor};
pub use ride::{RideDetails, RideRequest};
pub use simulator::RouteSimulator;

/// Interpolate `segments + 1` points from `origin` to `destination`
///
/// Point `i` lies at fraction `i / segments` of the way. The first point is
/// exactly `origin` and the last exactly `destination`. `segments` is clamped
/// to `1..=MAX_SEGMENTS`.
pub fn generate_route(origin: GeoPoint, destination: GeoPoint, segments: usize) -> Vec<GeoPoint> {
    let segments = segments.clamp(1, MAX_SEGMENTS);

    let mut route = Vec::with_capacity(segments + 1);
    route.push(origin);
    for i in 1..segments {
        let t = i as f64 / segments as f64;
        route.push(origin.lerp(&destination, t));
    }
    route.push(destination);
    route
}

/// A confirmed route, shared read-only with the simulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    /// Every point the marker visits, origin and destination included
    pub waypoints: Vec<GeoPoint>,
}

impl RoutePlan {
    pub fn new(origin: GeoPoint, destination: GeoPoint, segments: usize) -> Self {
        Self {
            origin,
            destination,
            waypoints: generate_route(origin, destination, segments),
        }
    }

    /// Index of the destination waypoint
    pub fn last_index(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    /// Straight-line length in meters
    pub fn length_meters(&self) -> f64 {
        path_length(&self.waypoints)
    }
}
