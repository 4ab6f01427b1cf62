//! URL output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::RideFormatter;
use crate::sim::RideRequest;

/// URL formatter - map URL centred on the pickup
pub struct UrlFormatter;

impl UrlFormatter {
    /// Format URL with optional provider override
    pub fn format_with_provider(
        &self,
        ride: &RideRequest,
        config: &Config,
        provider: Option<&str>,
    ) -> Result<String> {
        config.format_url(provider, ride.route.origin)
    }
}

impl RideFormatter for UrlFormatter {
    fn name(&self) -> &str {
        "url"
    }

    fn description(&self) -> &str {
        "Map URL for the pickup"
    }

    fn format(&self, ride: &RideRequest, config: &Config) -> Result<String> {
        self.format_with_provider(ride, config, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::format::sample_ride;

    #[test]
    fn test_url_format_default_provider() {
        let output = UrlFormatter.format(&sample_ride(), &Config::default()).unwrap();
        assert_eq!(output, "https://www.openstreetmap.org/#map=18/30.0444/31.2357");
    }

    #[test]
    fn test_url_format_with_provider() {
        let output = UrlFormatter
            .format_with_provider(&sample_ride(), &Config::default(), Some("google"))
            .unwrap();
        assert!(output.contains("google.com/maps/@30.0444,31.2357"));
    }

    #[test]
    fn test_url_format_unknown_provider() {
        let result =
            UrlFormatter.format_with_provider(&sample_ride(), &Config::default(), Some("bing"));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
