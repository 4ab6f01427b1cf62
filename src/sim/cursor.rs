//! Simulation cursor and progress snapshots

use crate::coord::GeoPoint;
use crate::sim::RoutePlan;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Lifecycle of a route simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimState {
    /// Constructed, marker at the origin
    Idle,
    /// Timer active
    Running,
    /// Marker reached the destination
    Finished,
    /// Stopped before reaching the destination
    Stopped,
}

impl SimState {
    /// No further snapshots will be published
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Stopped)
    }
}

impl fmt::Display for SimState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Finished => write!(f, "finished"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

/// What observers see after each step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub state: SimState,
    pub index: usize,
    pub position: GeoPoint,
}

/// Marker position along a route plan
#[derive(Debug, Clone)]
pub struct SimulationCursor {
    plan: Arc<RoutePlan>,
    index: usize,
    current_position: GeoPoint,
}

impl SimulationCursor {
    /// Cursor at the origin (index 0)
    pub fn new(plan: Arc<RoutePlan>) -> Self {
        let current_position = plan.waypoints.first().copied().unwrap_or(plan.origin);
        Self {
            plan,
            index: 0,
            current_position,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn position(&self) -> GeoPoint {
        self.current_position
    }

    pub fn is_at_end(&self) -> bool {
        self.index >= self.plan.last_index()
    }

    /// Move one waypoint forward
    ///
    /// Returns the new position, or None once the destination is reached.
    /// The index never passes the last waypoint.
    pub fn advance(&mut self) -> Option<GeoPoint> {
        if self.is_at_end() {
            return None;
        }
        self.index += 1;
        self.current_position = self.plan.waypoints[self.index];
        Some(self.current_position)
    }

    pub fn snapshot(&self, state: SimState) -> SimSnapshot {
        SimSnapshot {
            state,
            index: self.index,
            position: self.current_position,
        }
    }
}
