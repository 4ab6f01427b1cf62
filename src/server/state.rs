//! Server shared state
//!
//! Holds configuration and the location resolver shared by all handlers.

use crate::config::Config;
use crate::error::Result;
use crate::geo::{resolver_from_config, LiveResolver};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Shared state for the HTTP server
pub struct AppState {
    /// Configuration
    pub config: Arc<RwLock<Config>>,

    /// Resolver built from the configuration at startup
    pub resolver: Arc<LiveResolver>,

    started: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config) -> Result<Self> {
        let resolver = resolver_from_config(&config)?;
        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            resolver: Arc::new(resolver),
            started: Instant::now(),
        })
    }

    /// Seconds since the state was created
    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}
