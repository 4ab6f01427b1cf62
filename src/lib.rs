//! ride-sim: location resolution and simulated ride tracking
//!
//! A library and CLI tool behind the 3a Transportation booking widget. It
//! turns typed addresses, device positions and map clicks into geocoded
//! locations, and replays a straight-line ride between two of them.
//!
//! ## Features
//!
//! - Forward and reverse geocoding through Nominatim, with coordinate fallback
//! - Device position from ip-api.com, a fixed point, or a denied source
//! - A location picker with last-writer-wins updates
//! - A timer-driven route simulator with observable progress
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use ride_sim::coord::GeoPoint;
//! use ride_sim::sim::generate_route;
//!
//! let pickup = GeoPoint::new(30.0444, 31.2357).unwrap();
//! let destination = GeoPoint::new(30.0626, 31.2497).unwrap();
//!
//! let route = generate_route(pickup, destination, 20);
//! assert_eq!(route.len(), 21);
//! assert_eq!(route[0], pickup);
//! assert_eq!(route[20], destination);
//! ```

pub mod booking;
pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod format;
pub mod geo;
pub mod picker;
pub mod server;
pub mod sim;

// Re-export commonly used types
pub use booking::BookingForm;
pub use config::Config;
pub use coord::GeoPoint;
pub use error::{Error, PositionError, Result};
pub use geo::{LocationResolver, ResolvedLocation};
pub use picker::LocationPicker;
pub use sim::{generate_route, RideRequest, RoutePlan, RouteSimulator};
