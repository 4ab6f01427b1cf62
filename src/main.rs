//! ride-sim CLI entry point
//!
//! Location resolution and ride simulation - CLI + HTTP API

use ride_sim::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
