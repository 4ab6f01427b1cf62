//! Serve command handler
//!
//! Runs the HTTP API in the foreground until interrupted.

use crate::config::{Config, DeviceSource};
use crate::error::{Error, Result};
use crate::server;
use clap::Args;
use std::str::FromStr;
use tracing::info;

/// Serve command arguments
#[derive(Args)]
pub struct ServeArgs {
    /// Host address to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Device position source for /api/locate (ip, fixed, denied)
    #[arg(long)]
    pub device: Option<String>,
}

/// Run the serve command
pub async fn run(args: ServeArgs) -> Result<()> {
    let mut config = Config::load()?;

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(device) = args.device.as_deref() {
        config.device.source = DeviceSource::from_str(device).map_err(Error::Config)?;
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %config.server_addr(),
        geocoder = %config.geocoder.base_url,
        device = %config.device.source,
        "starting ride-sim server"
    );

    server::run(config).await
}
