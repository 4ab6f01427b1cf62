//! Timer-driven route simulator
//!
//! One tokio task owns the cursor and advances it once per tick. Progress is
//! published through a `watch` channel; publishing is conditional on the
//! simulation still running, so nothing is observed after `stop`.

use crate::sim::cursor::{SimSnapshot, SimState, SimulationCursor};
use crate::sim::RoutePlan;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Steps a marker from origin to destination on a fixed cadence
pub struct RouteSimulator {
    plan: Arc<RoutePlan>,
    tick: Duration,
    progress: Arc<watch::Sender<SimSnapshot>>,
    task: Option<JoinHandle<()>>,
}

impl RouteSimulator {
    /// Create an idle simulator with the marker at the origin
    pub fn new(plan: Arc<RoutePlan>, tick: Duration) -> Self {
        let initial = SimulationCursor::new(Arc::clone(&plan)).snapshot(SimState::Idle);
        let (progress, _) = watch::channel(initial);
        Self {
            plan,
            tick,
            progress: Arc::new(progress),
            task: None,
        }
    }

    pub fn plan(&self) -> &Arc<RoutePlan> {
        &self.plan
    }

    /// Observe progress snapshots
    pub fn subscribe(&self) -> watch::Receiver<SimSnapshot> {
        self.progress.subscribe()
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> SimSnapshot {
        *self.progress.borrow()
    }

    pub fn state(&self) -> SimState {
        self.progress.borrow().state
    }

    /// Start the timer; only valid from `Idle`
    ///
    /// Returns false without side effects in any other state. Must be called
    /// inside a tokio runtime.
    pub fn start(&mut self) -> bool {
        let cursor = SimulationCursor::new(Arc::clone(&self.plan));
        let next = if cursor.is_at_end() {
            SimState::Finished
        } else {
            SimState::Running
        };

        let started = self.progress.send_if_modified(|snap| {
            if snap.state != SimState::Idle {
                return false;
            }
            snap.state = next;
            true
        });
        if !started {
            debug!(state = %self.state(), "simulator not idle, ignoring start");
            return false;
        }
        if next == SimState::Finished {
            info!("route has a single waypoint, simulation finished");
            return true;
        }

        info!(
            waypoints = self.plan.waypoints.len(),
            tick_ms = self.tick.as_millis() as u64,
            "simulation started"
        );

        let progress = Arc::clone(&self.progress);
        self.task = Some(tokio::spawn(drive(cursor, progress, self.tick)));
        true
    }

    /// Stop the simulation and release the cursor
    ///
    /// Safe in every state. A finished simulation stays `Finished`.
    pub fn stop(&mut self) {
        let stopped = self.progress.send_if_modified(|snap| match snap.state {
            SimState::Idle | SimState::Running => {
                snap.state = SimState::Stopped;
                true
            }
            SimState::Finished | SimState::Stopped => false,
        });
        if let Some(task) = self.task.take() {
            task.abort();
        }
        if stopped {
            info!("simulation stopped");
        }
    }

    /// Wait until the simulation finishes or is stopped
    ///
    /// Returns the current snapshot at once if the simulator was never started.
    pub async fn wait(&self) -> SimSnapshot {
        let mut rx = self.subscribe();
        if rx.borrow().state == SimState::Idle {
            return self.snapshot();
        }
        let done = match rx.wait_for(|snap| snap.state.is_terminal()).await {
            Ok(snap) => *snap,
            Err(_) => self.snapshot(),
        };
        done
    }
}

impl Drop for RouteSimulator {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn drive(
    mut cursor: SimulationCursor,
    progress: Arc<watch::Sender<SimSnapshot>>,
    tick: Duration,
) {
    let mut ticker = time::interval_at(Instant::now() + tick, tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if cursor.advance().is_none() {
            let last = cursor.snapshot(SimState::Finished);
            progress.send_if_modified(|snap| {
                if snap.state != SimState::Running {
                    return false;
                }
                *snap = last;
                true
            });
            break;
        }

        let finished = cursor.is_at_end();
        let state = if finished {
            SimState::Finished
        } else {
            SimState::Running
        };
        let next = cursor.snapshot(state);

        let published = progress.send_if_modified(|snap| {
            if snap.state != SimState::Running {
                return false;
            }
            *snap = next;
            true
        });

        if !published {
            break;
        }
        if finished {
            info!(index = next.index, "simulation finished");
            break;
        }
    }
}
