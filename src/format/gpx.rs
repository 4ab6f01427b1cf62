//! GPX output formatter

use crate::config::Config;
use crate::coord::GeoPoint;
use crate::error::Result;
use crate::format::RideFormatter;
use crate::sim::RideRequest;

/// GPX formatter - route as a track plus pickup and destination waypoints
pub struct GpxFormatter;

/// Escape text for XML element content
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn push_waypoint(gpx: &mut String, point: GeoPoint, name: &str, desc: &str, symbol: &str) {
    gpx.push_str(&format!(r#"  <wpt lat="{}" lon="{}">"#, point.lat(), point.lng()));
    gpx.push('\n');
    gpx.push_str(&format!("    <name>{}</name>\n", name));
    gpx.push_str(&format!("    <desc>{}</desc>\n", escape(desc)));
    gpx.push_str(&format!("    <sym>{}</sym>\n", symbol));
    gpx.push_str("  </wpt>\n");
}

impl RideFormatter for GpxFormatter {
    fn name(&self) -> &str {
        "gpx"
    }

    fn description(&self) -> &str {
        "GPX route track"
    }

    fn format(&self, ride: &RideRequest, _config: &Config) -> Result<String> {
        let mut gpx = String::new();

        // XML header
        gpx.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        gpx.push('\n');
        gpx.push_str(r#"<gpx version="1.1" creator="ride-sim">"#);
        gpx.push('\n');

        // Metadata
        gpx.push_str("  <metadata>\n");
        gpx.push_str(&format!("    <name>ride {}</name>\n", ride.id));
        gpx.push_str(&format!("    <time>{}</time>\n", ride.requested_at.to_rfc3339()));
        gpx.push_str("  </metadata>\n");

        push_waypoint(&mut gpx, ride.route.origin, "Pickup", &ride.pickup.address, "flag");
        push_waypoint(
            &mut gpx,
            ride.route.destination,
            "Destination",
            &ride.destination.address,
            "pin",
        );

        // Route track
        gpx.push_str("  <trk>\n");
        gpx.push_str("    <name>Route</name>\n");
        gpx.push_str("    <trkseg>\n");
        for point in &ride.route.waypoints {
            gpx.push_str(&format!(
                "      <trkpt lat=\"{}\" lon=\"{}\"/>\n",
                point.lat(),
                point.lng()
            ));
        }
        gpx.push_str("    </trkseg>\n");
        gpx.push_str("  </trk>\n");

        gpx.push_str("</gpx>\n");
        Ok(gpx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::sample_ride;

    #[test]
    fn test_gpx_format() {
        let output = GpxFormatter.format(&sample_ride(), &Config::default()).unwrap();

        assert!(output.contains(r#"<?xml version="1.0""#));
        assert!(output.contains(r#"<gpx version="1.1" creator="ride-sim">"#));
        assert!(output.contains("<name>Pickup</name>"));
        assert!(output.contains("<name>Destination</name>"));
        assert!(output.contains(r#"<wpt lat="30.0444" lon="31.2357">"#));
        assert_eq!(output.matches("<trkpt").count(), 21);
        assert!(output.ends_with("</gpx>\n"));
    }

    #[test]
    fn test_gpx_escapes_addresses() {
        let mut ride = sample_ride();
        ride.pickup.address = "Fish & Chips <Zamalek>".to_string();

        let output = GpxFormatter.format(&ride, &Config::default()).unwrap();
        assert!(output.contains("Fish &amp; Chips &lt;Zamalek&gt;"));
    }
}
