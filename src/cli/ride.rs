//! Ride command handler
//!
//! Fills the booking form from the command line, requests the ride and
//! optionally replays the marker along its route.

use crate::booking::BookingForm;
use crate::config::Config;
use crate::coord::GeoPoint;
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter, url::UrlFormatter};
use crate::geo::{resolver_from_config, DevicePositionSource, GeoBackend};
use crate::picker::LocationPicker;
use crate::sim::{RideRequest, RouteSimulator};
use clap::Args;
use std::sync::Arc;
use tracing::warn;

/// Ride command arguments
#[derive(Args)]
pub struct RideArgs {
    /// Pickup address
    #[arg(long, required_unless_present = "pickup_lat", conflicts_with = "pickup_lat")]
    pub pickup: Option<String>,

    /// Pickup latitude (labelled by reverse geocoding)
    #[arg(long, allow_hyphen_values = true, requires = "pickup_lng")]
    pub pickup_lat: Option<f64>,

    /// Pickup longitude
    #[arg(long, allow_hyphen_values = true, requires = "pickup_lat")]
    pub pickup_lng: Option<f64>,

    /// Destination address
    #[arg(
        long,
        required_unless_present = "destination_lat",
        conflicts_with = "destination_lat"
    )]
    pub destination: Option<String>,

    /// Destination latitude (labelled by reverse geocoding)
    #[arg(long, allow_hyphen_values = true, requires = "destination_lng")]
    pub destination_lat: Option<f64>,

    /// Destination longitude
    #[arg(long, allow_hyphen_values = true, requires = "destination_lat")]
    pub destination_lng: Option<f64>,

    /// Geocode typed addresses instead of using the default coordinates
    #[arg(long)]
    pub resolve: bool,

    /// Output format (json, text, gpx, url)
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Map provider for the url format
    #[arg(long)]
    pub provider: Option<String>,

    /// Replay the marker along the route after booking
    #[arg(long)]
    pub simulate: bool,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<String>,
}

fn point_from(lat: Option<f64>, lng: Option<f64>) -> Result<Option<GeoPoint>> {
    match (lat, lng) {
        (Some(lat), Some(lng)) => Ok(Some(GeoPoint::new(lat, lng)?)),
        _ => Ok(None),
    }
}

/// Drive one picker the way a user would
///
/// A coordinate goes through the map surface; text is typed and, with
/// `resolve`, searched.
async fn fill_field<G: GeoBackend, D: DevicePositionSource>(
    picker: &LocationPicker<G, D>,
    label: &str,
    address: Option<&str>,
    point: Option<GeoPoint>,
    resolve: bool,
) -> Result<()> {
    if let Some(point) = point {
        let surface = picker.open_map(address.unwrap_or_default());
        surface.select_point(point).await;
        if picker.confirm_map(surface).is_none() {
            warn!(label, %point, "map selection was not confirmed");
        }
        return Ok(());
    }

    let text = address.unwrap_or_default();
    picker.type_text(text);
    if !resolve || text.trim().is_empty() {
        return Ok(());
    }

    match picker.search(text).await {
        Ok(Some(found)) => eprintln!("{}: {}", label, found.address),
        Ok(None) => {}
        Err(e @ (Error::NotFound(_) | Error::Geocoding(_))) => {
            eprintln!("{}: {} (using the default {} coordinate)", label, e, label);
        }
        Err(e) => return Err(e),
    }
    Ok(())
}

/// Run the ride command
pub async fn run(args: RideArgs) -> Result<()> {
    let config = Config::load()?;

    let format = args.format.clone().unwrap_or_else(|| "text".to_string());
    let formatter = get_formatter(&format).ok_or_else(|| {
        let names: Vec<_> = available_formats().into_iter().map(|f| f.name).collect();
        Error::Config(format!(
            "Unknown format: {} (available: {})",
            format,
            names.join(", ")
        ))
    })?;

    let resolver = Arc::new(resolver_from_config(&config)?);
    let form = BookingForm::new(resolver);

    let pickup = form.pickup_picker();
    fill_field(
        &pickup,
        "pickup",
        args.pickup.as_deref(),
        point_from(args.pickup_lat, args.pickup_lng)?,
        args.resolve,
    )
    .await?;

    let destination = form.destination_picker();
    fill_field(
        &destination,
        "destination",
        args.destination.as_deref(),
        point_from(args.destination_lat, args.destination_lng)?,
        args.resolve,
    )
    .await?;

    let ride = form.request_ride(&config)?;

    let output = if format.eq_ignore_ascii_case("url") && args.provider.is_some() {
        UrlFormatter.format_with_provider(&ride, &config, args.provider.as_deref())?
    } else {
        formatter.format(&ride, &config)?
    };

    if let Some(path) = &args.output {
        std::fs::write(path, &output)?;
        eprintln!("Output written to {}", path);
    } else {
        println!("{}", output);
    }

    if args.simulate {
        simulate(&ride, &config).await;
    }
    Ok(())
}

/// Replay the route on stderr until it finishes or Ctrl-C is pressed
async fn simulate(ride: &RideRequest, config: &Config) {
    let plan = Arc::new(ride.route.clone());
    let last = plan.last_index();
    let mut sim = RouteSimulator::new(plan, config.tick());
    let mut progress = sim.subscribe();
    sim.start();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            changed = progress.changed() => {
                if changed.is_err() {
                    break;
                }
                let snap = *progress.borrow_and_update();
                eprintln!(
                    "[{:>3}/{}] {:.6}, {:.6} {}",
                    snap.index,
                    last,
                    snap.position.lat(),
                    snap.position.lng(),
                    snap.state
                );
                if snap.state.is_terminal() {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                sim.stop();
                eprintln!("Simulation stopped at {}/{}", sim.snapshot().index, last);
                break;
            }
        }
    }
}
