//! JSON output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::RideFormatter;
use crate::sim::RideRequest;

/// JSON formatter - outputs the full ride request as pretty-printed JSON
pub struct JsonFormatter;

impl RideFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Full ride request with route"
    }

    fn format(&self, ride: &RideRequest, _config: &Config) -> Result<String> {
        Ok(serde_json::to_string_pretty(ride)?)
    }
}
