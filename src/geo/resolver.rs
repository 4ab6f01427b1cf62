//! Location resolution
//!
//! Maps between free text, device position and `ResolvedLocation` values.
//! Every operation makes at most one outbound call and never retries.

use crate::coord::GeoPoint;
use crate::error::{Error, PositionError, Result};
use crate::geo::{DevicePositionSource, GeoBackend, ResolvedLocation};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Resolves text and coordinates through a geocoder and a position source
#[derive(Debug, Clone)]
pub struct LocationResolver<G, D> {
    geocoder: G,
    device: D,
    device_timeout: Duration,
}

impl<G: GeoBackend, D: DevicePositionSource> LocationResolver<G, D> {
    /// Create a resolver; device fixes are abandoned after `device_timeout`
    pub fn new(geocoder: G, device: D, device_timeout: Duration) -> Self {
        Self {
            geocoder,
            device,
            device_timeout,
        }
    }

    /// The geocoding backend
    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Reverse geocode `point`, falling back to its `"lat, lng"` text
    ///
    /// A failed lookup is not an error here: the coordinate stays usable for
    /// routing even without a readable label.
    pub async fn resolve_from_point(&self, point: GeoPoint) -> ResolvedLocation {
        match self.geocoder.reverse_geocode(point).await {
            Ok(Some(name)) => {
                debug!(%point, %name, "reverse geocoded");
                ResolvedLocation::new(name, point)
            }
            Ok(None) => {
                debug!(%point, "no name for point, using coordinates");
                ResolvedLocation::fallback(point)
            }
            Err(e) => {
                warn!(%point, error = %e, "reverse geocoding failed, using coordinates");
                ResolvedLocation::fallback(point)
            }
        }
    }

    /// Forward geocode `text` to its top-ranked match
    ///
    /// Blank input is rejected before any request is made.
    pub async fn resolve_from_query(&self, text: &str) -> Result<ResolvedLocation> {
        let query = text.trim();
        if query.is_empty() {
            return Err(Error::EmptyQuery);
        }

        match self.geocoder.geocode(query).await? {
            Some(found) => {
                info!(query, name = %found.display_name, "geocoded");
                Ok(ResolvedLocation::new(found.display_name, found.point))
            }
            None => {
                info!(query, "no geocoding results");
                Err(Error::NotFound(query.to_string()))
            }
        }
    }

    /// Request a single device position fix
    pub async fn resolve_current_device_position(
        &self,
    ) -> std::result::Result<GeoPoint, PositionError> {
        match tokio::time::timeout(self.device_timeout, self.device.current_position()).await {
            Ok(result) => {
                if let Err(e) = &result {
                    warn!(error = %e, "device position unavailable");
                }
                result
            }
            Err(_) => {
                warn!(timeout = ?self.device_timeout, "device position timed out");
                Err(PositionError::Timeout)
            }
        }
    }

    /// Device fix followed by reverse geocoding
    pub async fn resolve_current_location(
        &self,
    ) -> std::result::Result<ResolvedLocation, PositionError> {
        let point = self.resolve_current_device_position().await?;
        Ok(self.resolve_from_point(point).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::fake::{FakeDevice, FakeGeocoder};
    use crate::geo::nominatim::tests::{backend_for, spawn_stub};
    use crate::geo::FixedPosition;
    use approx::assert_abs_diff_eq;

    const TIMEOUT: Duration = Duration::from_secs(10);

    fn resolver(geocoder: FakeGeocoder) -> LocationResolver<FakeGeocoder, FakeDevice> {
        LocationResolver::new(geocoder, FakeDevice::at(30.0444, 31.2357), TIMEOUT)
    }

    #[tokio::test]
    async fn test_resolve_from_point_named() {
        let r = resolver(FakeGeocoder::new().with_reverse_name("Tahrir Square"));
        let point = GeoPoint::new(30.0444, 31.2357).unwrap();

        let loc = r.resolve_from_point(point).await;
        assert_eq!(loc.address, "Tahrir Square");
        assert_eq!(loc.point, Some(point));
    }

    #[tokio::test]
    async fn test_resolve_from_point_falls_back() {
        let r = resolver(FakeGeocoder::new().with_reverse_failure());
        let point = GeoPoint::new(30.0444, 31.2357).unwrap();

        let loc = r.resolve_from_point(point).await;
        assert_eq!(loc.address, "30.0444, 31.2357");
        assert_eq!(loc.point, Some(point));
    }

    #[tokio::test]
    async fn test_resolve_from_point_keeps_input_point() {
        let r = resolver(FakeGeocoder::new().with_reverse_failure());
        let samples = [(-90.0, -180.0), (90.0, 180.0), (0.0, 0.0), (-33.8688, 151.2093), (64.1466, -21.9426)];

        for (lat, lng) in samples {
            let point = GeoPoint::new(lat, lng).unwrap();
            let loc = r.resolve_from_point(point).await;
            let resolved = loc.point.unwrap();
            assert_abs_diff_eq!(resolved.lat(), lat, epsilon = 1e-12);
            assert_abs_diff_eq!(resolved.lng(), lng, epsilon = 1e-12);
        }
    }

    #[tokio::test]
    async fn test_resolve_from_point_against_unreachable_service() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let r = LocationResolver::new(
            backend_for(&format!("http://{}", addr)),
            FixedPosition(GeoPoint::new(0.0, 0.0).unwrap()),
            TIMEOUT,
        );
        let point = GeoPoint::new(30.0626, 31.2497).unwrap();
        let loc = r.resolve_from_point(point).await;
        assert_eq!(loc.address, "30.0626, 31.2497");
    }

    #[tokio::test]
    async fn test_empty_query_makes_no_request() {
        let geocoder = FakeGeocoder::new();
        let r = resolver(geocoder.clone());

        assert!(matches!(r.resolve_from_query("").await, Err(Error::EmptyQuery)));
        assert!(matches!(r.resolve_from_query("   \t").await, Err(Error::EmptyQuery)));
        assert_eq!(geocoder.calls(), 0);
    }

    #[tokio::test]
    async fn test_query_not_found() {
        let r = resolver(FakeGeocoder::new().with_empty("zzznonexistentplace123"));

        match r.resolve_from_query("zzznonexistentplace123").await {
            Err(Error::NotFound(query)) => assert_eq!(query, "zzznonexistentplace123"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_query_trims_and_resolves() {
        let r = resolver(FakeGeocoder::new().with_place("Cairo", 30.0444, 31.2357, "Cairo, Egypt", Duration::ZERO));

        let loc = r.resolve_from_query("  Cairo ").await.unwrap();
        assert_eq!(loc.address, "Cairo, Egypt");
        assert!(loc.is_complete());
    }

    #[tokio::test]
    async fn test_query_transport_failure_is_reported() {
        let r = resolver(FakeGeocoder::new().with_failure("Giza"));
        assert!(matches!(r.resolve_from_query("Giza").await, Err(Error::Geocoding(_))));
    }

    #[tokio::test]
    async fn test_query_against_nominatim_stub() {
        let r = LocationResolver::new(
            backend_for(&spawn_stub().await),
            FixedPosition(GeoPoint::new(0.0, 0.0).unwrap()),
            TIMEOUT,
        );

        let loc = r.resolve_from_query("Cairo").await.unwrap();
        assert_eq!(loc.address, "Cairo, Egypt");

        let missing = r.resolve_from_query("zzznonexistentplace123").await;
        assert!(matches!(missing, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_device_failures_are_distinct() {
        for kind in [
            PositionError::PermissionDenied,
            PositionError::PositionUnavailable,
            PositionError::Timeout,
        ] {
            let r = LocationResolver::new(FakeGeocoder::new(), FakeDevice::failing(kind), TIMEOUT);
            assert_eq!(r.resolve_current_device_position().await, Err(kind));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_device_times_out() {
        let device = FakeDevice::at(30.0, 31.0).delayed(Duration::from_secs(60));
        let r = LocationResolver::new(FakeGeocoder::new(), device, TIMEOUT);

        assert_eq!(
            r.resolve_current_device_position().await,
            Err(PositionError::Timeout)
        );
    }

    #[tokio::test]
    async fn test_current_location_is_reverse_geocoded() {
        let r = resolver(FakeGeocoder::new().with_reverse_name("Tahrir Square"));

        let loc = r.resolve_current_location().await.unwrap();
        assert_eq!(loc.address, "Tahrir Square");
        assert_eq!(loc.point, Some(GeoPoint::new(30.0444, 31.2357).unwrap()));
    }
}
