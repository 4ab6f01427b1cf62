//! Location picker control
//!
//! One address field with two resolution affordances: "use current location"
//! and "pick on map". The picker never stores the field's value; every
//! change goes to the owner's callback. It only keeps transient state: the
//! in-flight flag for the location button and the identity of the newest
//! request, so that a superseded lookup arriving late is dropped.

pub mod map_surface;
pub mod ticket;

use crate::error::{Error, Result};
use crate::geo::{DevicePositionSource, GeoBackend, LocationResolver, ResolvedLocation};
use map_surface::MapSelection;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use ticket::RequestTracker;
use tracing::debug;

/// Receives every value the picker produces
///
/// Runs while the picker holds its request lock, so it must not call back
/// into the same picker. Other pickers and channels are fine.
pub type ChangeCallback = Arc<dyn Fn(ResolvedLocation) + Send + Sync>;

/// Clears the in-flight flag however the lookup ends
struct LocatingGuard<'a>(&'a AtomicBool);

impl Drop for LocatingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Location picker bound to one owner field
pub struct LocationPicker<G, D> {
    resolver: Arc<LocationResolver<G, D>>,
    on_change: ChangeCallback,
    tracker: RequestTracker,
    locating: AtomicBool,
}

impl<G: GeoBackend, D: DevicePositionSource> LocationPicker<G, D> {
    /// Create a picker that reports changes to `on_change`
    ///
    /// `on_change` is called under the request lock; calling this picker's
    /// methods from inside it deadlocks.
    pub fn new(
        resolver: Arc<LocationResolver<G, D>>,
        on_change: impl Fn(ResolvedLocation) + Send + Sync + 'static,
    ) -> Self {
        Self {
            resolver,
            on_change: Arc::new(on_change),
            tracker: RequestTracker::new(),
            locating: AtomicBool::new(false),
        }
    }

    /// True while "use current location" is in flight (the button is disabled)
    pub fn is_locating(&self) -> bool {
        self.locating.load(Ordering::SeqCst)
    }

    fn emit(&self, ticket: ticket::Ticket, location: &ResolvedLocation) -> bool {
        self.tracker
            .apply_if_current(ticket, || (self.on_change)(location.clone()))
    }

    /// Direct typing: the text is forwarded with no coordinate
    ///
    /// Typing also supersedes any lookup still in flight.
    pub fn type_text(&self, text: &str) {
        let ticket = self.tracker.issue();
        self.emit(ticket, &ResolvedLocation::typed(text));
    }

    /// "Use current location"
    ///
    /// Returns `Ok(None)` when the button is already busy or the result was
    /// superseded. A position failure leaves the owner's value untouched and
    /// is returned so the caller can show `PositionError::notice`.
    pub async fn use_current_location(&self) -> Result<Option<ResolvedLocation>> {
        if self.locating.swap(true, Ordering::SeqCst) {
            debug!("current location already in flight");
            return Ok(None);
        }
        let _guard = LocatingGuard(&self.locating);

        let ticket = self.tracker.issue();
        let location = self.resolver.resolve_current_location().await?;

        if !self.emit(ticket, &location) {
            debug!("discarding superseded current location");
            return Ok(None);
        }
        Ok(Some(location))
    }

    /// Resolve typed text to its top match and forward it
    ///
    /// `EmptyQuery` and `NotFound` leave the owner's value untouched.
    pub async fn search(&self, text: &str) -> Result<Option<ResolvedLocation>> {
        if text.trim().is_empty() {
            return Err(Error::EmptyQuery);
        }
        let ticket = self.tracker.issue();
        let location = self.resolver.resolve_from_query(text).await?;

        if !self.emit(ticket, &location) {
            debug!(query = text, "discarding superseded search");
            return Ok(None);
        }
        Ok(Some(location))
    }

    /// "Pick on map": open the surface seeded with the field's current text
    pub fn open_map(&self, current_value: &str) -> MapSelection<G, D> {
        MapSelection::new(Arc::clone(&self.resolver), current_value)
    }

    /// Forward the map surface's confirmed value unchanged
    ///
    /// Returns None (and forwards nothing) while confirm is disabled.
    pub fn confirm_map(&self, selection: MapSelection<G, D>) -> Option<ResolvedLocation> {
        let location = selection.confirm()?;
        selection.cancel();

        let ticket = self.tracker.issue();
        self.emit(ticket, &location).then_some(location)
    }

    /// Owner is going away: nothing in flight may reach the callback
    pub fn detach(&self) {
        self.tracker.close();
    }
}
