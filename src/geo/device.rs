//! Device position sources
//!
//! A source answers "where is this device right now" with a single fix or one
//! of the `PositionError` kinds. The resolver bounds every request with a
//! timeout, so sources do not need their own.

use crate::config::{Config, DeviceSource};
use crate::coord::GeoPoint;
use crate::error::{PositionError, Result};
use crate::geo::ip_location::IpPositionSource;
use std::future::Future;

/// Trait for device position capabilities
pub trait DevicePositionSource: Send + Sync {
    /// Request a single position fix
    fn current_position(&self) -> impl Future<Output = std::result::Result<GeoPoint, PositionError>> + Send;
}

/// Always reports the same coordinate
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub GeoPoint);

impl DevicePositionSource for FixedPosition {
    async fn current_position(&self) -> std::result::Result<GeoPoint, PositionError> {
        Ok(self.0)
    }
}

/// Location access has not been granted
#[derive(Debug, Clone, Copy, Default)]
pub struct DeniedPosition;

impl DevicePositionSource for DeniedPosition {
    async fn current_position(&self) -> std::result::Result<GeoPoint, PositionError> {
        Err(PositionError::PermissionDenied)
    }
}

/// The source selected by `[device] source` in the config
#[derive(Debug, Clone)]
pub enum ConfiguredPosition {
    Ip(IpPositionSource),
    Fixed(FixedPosition),
    Denied(DeniedPosition),
}

impl ConfiguredPosition {
    /// Build the configured source
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(match config.device.source {
            DeviceSource::Ip => Self::Ip(IpPositionSource::new(config.device_timeout())?),
            DeviceSource::Fixed => Self::Fixed(FixedPosition(config.fixed_device_position()?)),
            DeviceSource::Denied => Self::Denied(DeniedPosition),
        })
    }
}

impl DevicePositionSource for ConfiguredPosition {
    async fn current_position(&self) -> std::result::Result<GeoPoint, PositionError> {
        match self {
            Self::Ip(source) => source.current_position().await,
            Self::Fixed(source) => source.current_position().await,
            Self::Denied(source) => source.current_position().await,
        }
    }
}
