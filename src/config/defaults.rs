//! Default configuration values
//!
//! Named constants for all tunable parameters

use crate::constants::{api, sim};

/// Default geocoding endpoint
pub const DEFAULT_GEOCODER_URL: &str = api::NOMINATIM_URL;

/// Default User-Agent sent to the geocoder
pub const DEFAULT_USER_AGENT: &str = api::USER_AGENT;

/// Default geocoding request timeout in seconds
pub const DEFAULT_GEOCODER_TIMEOUT_SECS: u64 = 10;

/// Default device position source
pub const DEFAULT_DEVICE_SOURCE: &str = "ip";

/// Default device position timeout in seconds
pub const DEFAULT_DEVICE_TIMEOUT_SECS: u64 = 10;

/// Default interpolation segments
pub const DEFAULT_SEGMENTS: usize = sim::DEFAULT_SEGMENTS;

/// Default simulator tick in milliseconds
pub const DEFAULT_TICK_MS: u64 = sim::DEFAULT_TICK_MS;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7878;

/// Default URL provider
pub const DEFAULT_URL_PROVIDER: &str = "openstreetmap";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "ride-sim";
