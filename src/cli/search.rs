//! Search command handler
//!
//! Forward geocodes a place name to its top match.

use crate::config::Config;
use crate::error::Result;
use crate::geo::resolver_from_config;
use clap::Args;

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Place name or address
    pub query: String,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the search command
pub async fn run(args: SearchArgs) -> Result<()> {
    let config = Config::load()?;
    let resolver = resolver_from_config(&config)?;

    let location = resolver.resolve_from_query(&args.query).await?;

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
