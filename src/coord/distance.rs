//! Straight-line distances between points
//!
//! Geometry only: these are great-circle lengths, not road distances.

use crate::constants::geo::EARTH_RADIUS_METERS;
use crate::coord::GeoPoint;

/// Calculate the distance between two points in meters (Haversine formula)
pub fn haversine_distance(p1: GeoPoint, p2: GeoPoint) -> f64 {
    let lat1 = p1.lat().to_radians();
    let lat2 = p2.lat().to_radians();
    let delta_lat = (p2.lat() - p1.lat()).to_radians();
    let delta_lng = (p2.lng() - p1.lng()).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Total length of a polyline in meters
pub fn path_length(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| haversine_distance(pair[0], pair[1]))
        .sum()
}
