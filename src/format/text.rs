//! Human-readable text output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::RideFormatter;
use crate::sim::RideRequest;

/// Text formatter - the ride card as plain text
pub struct TextFormatter;

impl RideFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable ride card"
    }

    fn format(&self, ride: &RideRequest, _config: &Config) -> Result<String> {
        let mut output = String::new();
        let details = &ride.details;
        let origin = ride.route.origin;
        let destination = ride.route.destination;

        output.push_str(&format!(
            "Ride {} ({})\n",
            ride.id,
            ride.requested_at.to_rfc3339()
        ));
        output.push_str(&format!("{}\n\n", details.status));

        output.push_str(&format!("Pickup:      {}\n", ride.pickup.address));
        output.push_str(&format!(
            "             ({:.6}, {:.6})\n",
            origin.lat(),
            origin.lng()
        ));
        output.push_str(&format!("Destination: {}\n", ride.destination.address));
        output.push_str(&format!(
            "             ({:.6}, {:.6})\n\n",
            destination.lat(),
            destination.lng()
        ));

        output.push_str(&format!(
            "Captain: {} ({:.1})\n",
            details.captain, details.rating
        ));
        output.push_str(&format!("Vehicle: {} - {}\n", details.vehicle, details.plate));
        output.push_str(&format!("Arrival: {}\n", details.arrival));
        output.push_str(&format!(
            "Trip:    {}, {}\n",
            details.estimated_time, details.distance
        ));
        output.push_str(&format!(
            "Route:   {} waypoints, {:.2} km straight line\n",
            ride.route.waypoints.len(),
            ride.distance_meters() / 1000.0
        ));

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::sample_ride;

    #[test]
    fn test_text_format() {
        let ride = sample_ride();
        let output = TextFormatter.format(&ride, &Config::default()).unwrap();

        assert!(output.starts_with(&format!("Ride {}", ride.id)));
        assert!(output.contains("Pickup:      Tahrir Square, Cairo"));
        assert!(output.contains("(30.044400, 31.235700)"));
        assert!(output.contains("Captain Ahmed (4.8)"));
        assert!(output.contains("Toyota Corolla - ABC 1234"));
        assert!(output.contains("21 waypoints"));
    }
}
