//! Map-selection surface
//!
//! The dialog opened by "pick on map". It starts from the field's current
//! text, lets the user click a point or search for a place, and only
//! confirms once it holds both an address and a coordinate.

use crate::coord::GeoPoint;
use crate::error::{Error, PositionError, Result};
use crate::geo::{DevicePositionSource, GeoBackend, LocationResolver, ResolvedLocation};
use crate::picker::ticket::RequestTracker;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// State of one open map dialog
pub struct MapSelection<G, D> {
    resolver: Arc<LocationResolver<G, D>>,
    tracker: RequestTracker,
    selected: Mutex<ResolvedLocation>,
}

impl<G: GeoBackend, D: DevicePositionSource> MapSelection<G, D> {
    /// Open the surface pre-seeded with `initial_address`
    pub fn new(resolver: Arc<LocationResolver<G, D>>, initial_address: &str) -> Self {
        Self {
            resolver,
            tracker: RequestTracker::new(),
            selected: Mutex::new(ResolvedLocation::typed(initial_address)),
        }
    }

    fn selected(&self) -> MutexGuard<'_, ResolvedLocation> {
        self.selected.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current selection (address may be empty, point may be absent)
    pub fn selection(&self) -> ResolvedLocation {
        self.selected().clone()
    }

    fn replace(&self, location: ResolvedLocation) {
        *self.selected() = location;
    }

    /// The user clicked `point` on the map
    ///
    /// The address is looked up and falls back to the coordinate text, so a
    /// clicked point always becomes confirmable.
    pub async fn select_point(&self, point: GeoPoint) -> Option<ResolvedLocation> {
        let ticket = self.tracker.issue();
        let location = self.resolver.resolve_from_point(point).await;

        let applied = self
            .tracker
            .apply_if_current(ticket, || self.replace(location.clone()));
        if !applied {
            debug!(%point, "discarding superseded map click");
            return None;
        }
        Some(location)
    }

    /// Search box inside the dialog
    ///
    /// `EmptyQuery` and `NotFound` leave the current selection unchanged.
    pub async fn search(&self, text: &str) -> Result<Option<ResolvedLocation>> {
        if text.trim().is_empty() {
            return Err(Error::EmptyQuery);
        }
        let ticket = self.tracker.issue();
        let location = self.resolver.resolve_from_query(text).await?;

        let applied = self
            .tracker
            .apply_if_current(ticket, || self.replace(location.clone()));
        if !applied {
            debug!(query = text, "discarding superseded map search");
            return Ok(None);
        }
        Ok(Some(location))
    }

    /// Centre on the device position when the dialog opens
    ///
    /// Failure keeps whatever is selected; the map stays on its default view.
    pub async fn locate_device(&self) -> std::result::Result<Option<ResolvedLocation>, PositionError> {
        let ticket = self.tracker.issue();
        let location = self.resolver.resolve_current_location().await?;

        let applied = self
            .tracker
            .apply_if_current(ticket, || self.replace(location.clone()));
        Ok(applied.then_some(location))
    }

    /// Confirm is enabled only with both an address and a coordinate
    pub fn can_confirm(&self) -> bool {
        self.selected().is_complete()
    }

    /// The confirmed location, or None while confirm is disabled
    pub fn confirm(&self) -> Option<ResolvedLocation> {
        let selected = self.selected();
        selected.is_complete().then(|| selected.clone())
    }

    /// Close the dialog; any in-flight lookup is discarded
    pub fn cancel(self) {
        self.tracker.close();
    }
}
