//! Request identity for last-writer-wins updates
//!
//! Each resolution takes a ticket when it starts. Its result may only be
//! applied while that ticket is still the newest one issued, so a slow
//! response to an older request can never overwrite a newer one.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Identity of one initiated resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
struct TrackerState {
    latest: u64,
    closed: bool,
}

/// Issues tickets and gates updates on them
#[derive(Debug, Default)]
pub struct RequestTracker {
    state: Mutex<TrackerState>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a new request, superseding every earlier ticket
    pub fn issue(&self) -> Ticket {
        let mut state = self.lock();
        state.latest += 1;
        Ticket(state.latest)
    }

    /// Whether `ticket` is still the newest and the owner is still attached
    pub fn is_current(&self, ticket: Ticket) -> bool {
        let state = self.lock();
        !state.closed && state.latest == ticket.0
    }

    /// Run `apply` only if `ticket` is current; returns whether it ran
    ///
    /// The check and the update happen under one lock, so `apply` must not
    /// issue tickets on this tracker.
    pub fn apply_if_current(&self, ticket: Ticket, apply: impl FnOnce()) -> bool {
        let state = self.lock();
        if state.closed || state.latest != ticket.0 {
            return false;
        }
        apply();
        drop(state);
        true
    }

    /// Stop accepting results; every outstanding ticket becomes stale
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        state.latest += 1;
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}
