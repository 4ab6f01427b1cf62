//! Centralized constants for the ride-sim crate
//!
//! Values shared between the config defaults, the resolver and the simulator.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in meters (WGS84 approximation)
    pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

    /// Default pickup when the form has no resolved coordinate (Cairo)
    pub const DEFAULT_PICKUP: (f64, f64) = (30.0444, 31.2357);

    /// Default destination when the form has no resolved coordinate
    pub const DEFAULT_DESTINATION: (f64, f64) = (30.0626, 31.2497);
}

/// External API endpoints
pub mod api {
    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";

    /// Nominatim rejects requests without an identifying agent
    pub const USER_AGENT: &str = concat!("ride-sim/", env!("CARGO_PKG_VERSION"));
}

/// Route simulation settings
pub mod sim {
    /// Interpolation segments between pickup and destination
    pub const DEFAULT_SEGMENTS: usize = 20;

    /// Upper bound on interpolation segments
    pub const MAX_SEGMENTS: usize = 10_000;

    /// Marker cadence in milliseconds
    pub const DEFAULT_TICK_MS: u64 = 100;
}
