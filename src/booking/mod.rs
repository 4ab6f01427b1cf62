//! Booking form
//!
//! Owns the pickup and destination values. Each field is fed by its own
//! `LocationPicker`, which reports changes through a callback; the form
//! keeps the latest value and turns the pair into a `RideRequest`.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::geo::{DevicePositionSource, GeoBackend, LocationResolver, ResolvedLocation};
use crate::picker::LocationPicker;
use crate::sim::RideRequest;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

const INCOMPLETE_MESSAGE: &str = "Please select both pickup and destination locations";

/// Pickup and destination fields of the ride form
pub struct BookingForm<G, D> {
    resolver: Arc<LocationResolver<G, D>>,
    pickup: Arc<watch::Sender<ResolvedLocation>>,
    destination: Arc<watch::Sender<ResolvedLocation>>,
}

fn field() -> Arc<watch::Sender<ResolvedLocation>> {
    let (tx, _) = watch::channel(ResolvedLocation::default());
    Arc::new(tx)
}

fn picker_for<G: GeoBackend, D: DevicePositionSource>(
    resolver: &Arc<LocationResolver<G, D>>,
    field: &Arc<watch::Sender<ResolvedLocation>>,
) -> LocationPicker<G, D> {
    let field = Arc::clone(field);
    LocationPicker::new(Arc::clone(resolver), move |location| {
        field.send_replace(location);
    })
}

impl<G: GeoBackend, D: DevicePositionSource> BookingForm<G, D> {
    /// An empty form
    pub fn new(resolver: Arc<LocationResolver<G, D>>) -> Self {
        Self {
            resolver,
            pickup: field(),
            destination: field(),
        }
    }

    /// Picker wired to the pickup field
    pub fn pickup_picker(&self) -> LocationPicker<G, D> {
        picker_for(&self.resolver, &self.pickup)
    }

    /// Picker wired to the destination field
    pub fn destination_picker(&self) -> LocationPicker<G, D> {
        picker_for(&self.resolver, &self.destination)
    }

    pub fn pickup(&self) -> ResolvedLocation {
        self.pickup.borrow().clone()
    }

    pub fn destination(&self) -> ResolvedLocation {
        self.destination.borrow().clone()
    }

    /// Observe pickup changes
    pub fn watch_pickup(&self) -> watch::Receiver<ResolvedLocation> {
        self.pickup.subscribe()
    }

    /// Observe destination changes
    pub fn watch_destination(&self) -> watch::Receiver<ResolvedLocation> {
        self.destination.subscribe()
    }

    /// Confirm the booking
    ///
    /// Both addresses must be filled in. A field that was typed but never
    /// resolved uses the configured default coordinate for its end.
    pub fn request_ride(&self, config: &Config) -> Result<RideRequest> {
        request_ride(&self.pickup(), &self.destination(), config)
    }
}

/// Build a ride from two field values
pub fn request_ride(
    pickup: &ResolvedLocation,
    destination: &ResolvedLocation,
    config: &Config,
) -> Result<RideRequest> {
    if pickup.address.trim().is_empty() || destination.address.trim().is_empty() {
        return Err(Error::IncompleteBooking(INCOMPLETE_MESSAGE.to_string()));
    }

    let from = match pickup.point {
        Some(point) => point,
        None => config.default_pickup()?,
    };
    let to = match destination.point {
        Some(point) => point,
        None => config.default_destination()?,
    };

    let ride = RideRequest::new(
        pickup.address.clone(),
        from,
        destination.address.clone(),
        to,
        config.simulation.segments,
    );
    info!(
        id = %ride.id,
        pickup = %ride.pickup.address,
        destination = %ride.destination.address,
        "ride requested"
    );
    Ok(ride)
}
