//! In-memory geocoder and position source for tests

use crate::coord::GeoPoint;
use crate::error::{Error, PositionError, Result};
use crate::geo::device::DevicePositionSource;
use crate::geo::{GeoBackend, GeoMatch};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
enum Answer {
    Found(GeoMatch),
    Empty,
    Fail,
}

/// Scripted geocoder: each query has a fixed delay and answer
#[derive(Clone, Default)]
pub struct FakeGeocoder {
    searches: HashMap<String, (Duration, Answer)>,
    reverse_name: Option<String>,
    reverse_fails: bool,
    calls: Arc<AtomicUsize>,
}

impl FakeGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_place(mut self, query: &str, lat: f64, lng: f64, name: &str, delay: Duration) -> Self {
        let found = GeoMatch {
            point: GeoPoint::new(lat, lng).unwrap(),
            display_name: name.to_string(),
        };
        self.searches.insert(query.to_string(), (delay, Answer::Found(found)));
        self
    }

    pub fn with_empty(mut self, query: &str) -> Self {
        self.searches.insert(query.to_string(), (Duration::ZERO, Answer::Empty));
        self
    }

    pub fn with_failure(mut self, query: &str) -> Self {
        self.searches.insert(query.to_string(), (Duration::ZERO, Answer::Fail));
        self
    }

    pub fn with_reverse_name(mut self, name: &str) -> Self {
        self.reverse_name = Some(name.to_string());
        self
    }

    pub fn with_reverse_failure(mut self) -> Self {
        self.reverse_fails = true;
        self
    }

    /// Number of calls that reached the "network"
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl GeoBackend for FakeGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<GeoMatch>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (delay, answer) = self
            .searches
            .get(query)
            .cloned()
            .unwrap_or((Duration::ZERO, Answer::Empty));
        tokio::time::sleep(delay).await;
        match answer {
            Answer::Found(found) => Ok(Some(found)),
            Answer::Empty => Ok(None),
            Answer::Fail => Err(Error::Geocoding("connection refused".to_string())),
        }
    }

    async fn reverse_geocode(&self, _point: GeoPoint) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.reverse_fails {
            return Err(Error::Geocoding("connection refused".to_string()));
        }
        Ok(self.reverse_name.clone())
    }
}

/// Scripted device position source
#[derive(Clone)]
pub struct FakeDevice {
    pub result: std::result::Result<GeoPoint, PositionError>,
    pub delay: Duration,
}

impl FakeDevice {
    pub fn at(lat: f64, lng: f64) -> Self {
        Self {
            result: Ok(GeoPoint::new(lat, lng).unwrap()),
            delay: Duration::ZERO,
        }
    }

    pub fn failing(err: PositionError) -> Self {
        Self {
            result: Err(err),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl DevicePositionSource for FakeDevice {
    async fn current_position(&self) -> std::result::Result<GeoPoint, PositionError> {
        tokio::time::sleep(self.delay).await;
        self.result
    }
}
