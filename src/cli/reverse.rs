//! Reverse command handler
//!
//! Labels a coordinate with its address. Falls back to the coordinate text
//! when the geocoder has no name for it.

use crate::config::Config;
use crate::coord::GeoPoint;
use crate::error::Result;
use crate::geo::resolver_from_config;
use clap::Args;

/// Reverse command arguments
#[derive(Args)]
pub struct ReverseArgs {
    /// Latitude
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the reverse command
pub async fn run(args: ReverseArgs) -> Result<()> {
    let point = GeoPoint::new(args.lat, args.lng)?;
    let config = Config::load()?;
    let resolver = resolver_from_config(&config)?;

    let location = resolver.resolve_from_point(point).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&location)?);
    } else {
        println!("{}", location.address);
    }
    Ok(())
}
