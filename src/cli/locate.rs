//! Locate command handler
//!
//! Resolves the device position (per `[device] source`) to an address.

use crate::config::Config;
use crate::error::Result;
use crate::geo::resolver_from_config;
use clap::Args;

/// Locate command arguments
#[derive(Args)]
pub struct LocateArgs {
    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the locate command
pub async fn run(args: LocateArgs) -> Result<()> {
    let config = Config::load()?;
    let resolver = resolver_from_config(&config)?;

    let location = match resolver.resolve_current_location().await {
        Ok(location) => location,
        Err(e) => {
            eprintln!("{}", e.notice());
            return Err(e.into());
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&location)?);
    } else {
        println!("{}", location.address);
        if let Some(point) = location.point {
            println!("{:.6}, {:.6}", point.lat(), point.lng());
        }
    }
    Ok(())
}
