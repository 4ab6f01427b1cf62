//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/ride-sim/config.toml

pub mod defaults;

use crate::constants::geo::{DEFAULT_DESTINATION, DEFAULT_PICKUP};
use crate::constants::sim::MAX_SEGMENTS;
use crate::coord::GeoPoint;
use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Geocoding service settings
    #[serde(default)]
    pub geocoder: GeocoderConfig,

    /// Device position settings
    #[serde(default)]
    pub device: DeviceConfig,

    /// Route simulation settings
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// URL generation settings
    #[serde(default)]
    pub url: UrlConfig,
}

/// Geocoding service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Base URL of a Nominatim-compatible service
    #[serde(default = "default_geocoder_url")]
    pub base_url: String,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "default_geocoder_timeout")]
    pub timeout_secs: u64,
}

/// Where device position fixes come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceSource {
    /// Approximate position from the public IP address
    Ip,
    /// A configured coordinate
    Fixed,
    /// Location access not granted
    Denied,
}

impl std::fmt::Display for DeviceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ip => write!(f, "ip"),
            Self::Fixed => write!(f, "fixed"),
            Self::Denied => write!(f, "denied"),
        }
    }
}

impl FromStr for DeviceSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ip" => Ok(Self::Ip),
            "fixed" => Ok(Self::Fixed),
            "denied" => Ok(Self::Denied),
            _ => Err(format!("Unknown device source: {}", s)),
        }
    }
}

/// Device position settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Position source
    #[serde(default = "default_device_source")]
    pub source: DeviceSource,

    /// Latitude reported by the fixed source
    #[serde(default = "default_pickup_lat")]
    pub fixed_lat: f64,

    /// Longitude reported by the fixed source
    #[serde(default = "default_pickup_lng")]
    pub fixed_lng: f64,

    /// Maximum time to wait for a fix, in seconds
    #[serde(default = "default_device_timeout")]
    pub timeout_secs: u64,
}

/// Route simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Interpolation segments between pickup and destination
    #[serde(default = "default_segments")]
    pub segments: usize,

    /// Marker cadence in milliseconds
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Pickup used when the form has no coordinate
    #[serde(default = "default_pickup_lat")]
    pub pickup_lat: f64,
    #[serde(default = "default_pickup_lng")]
    pub pickup_lng: f64,

    /// Destination used when the form has no coordinate
    #[serde(default = "default_destination_lat")]
    pub destination_lat: f64,
    #[serde(default = "default_destination_lng")]
    pub destination_lng: f64,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// URL generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    /// Default URL provider
    #[serde(default = "default_url_provider")]
    pub default: String,

    /// URL provider templates
    #[serde(default = "default_url_providers")]
    pub providers: HashMap<String, String>,
}

// Default value functions for serde
fn default_geocoder_url() -> String {
    DEFAULT_GEOCODER_URL.to_string()
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
fn default_geocoder_timeout() -> u64 {
    DEFAULT_GEOCODER_TIMEOUT_SECS
}
fn default_device_source() -> DeviceSource {
    DeviceSource::from_str(DEFAULT_DEVICE_SOURCE).unwrap_or(DeviceSource::Ip)
}
fn default_device_timeout() -> u64 {
    DEFAULT_DEVICE_TIMEOUT_SECS
}
fn default_segments() -> usize {
    DEFAULT_SEGMENTS
}
fn default_tick_ms() -> u64 {
    DEFAULT_TICK_MS
}
fn default_pickup_lat() -> f64 {
    DEFAULT_PICKUP.0
}
fn default_pickup_lng() -> f64 {
    DEFAULT_PICKUP.1
}
fn default_destination_lat() -> f64 {
    DEFAULT_DESTINATION.0
}
fn default_destination_lng() -> f64 {
    DEFAULT_DESTINATION.1
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_url_provider() -> String {
    DEFAULT_URL_PROVIDER.to_string()
}
fn default_url_providers() -> HashMap<String, String> {
    let mut providers = HashMap::new();
    providers.insert(
        "google".to_string(),
        "https://www.google.com/maps/@{lat},{lng},15z".to_string(),
    );
    providers.insert(
        "openstreetmap".to_string(),
        "https://www.openstreetmap.org/#map=18/{lat}/{lng}".to_string(),
    );
    providers.insert(
        "apple".to_string(),
        "https://maps.apple.com/?ll={lat},{lng}".to_string(),
    );
    providers
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoder_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_geocoder_timeout(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            source: default_device_source(),
            fixed_lat: default_pickup_lat(),
            fixed_lng: default_pickup_lng(),
            timeout_secs: default_device_timeout(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            segments: default_segments(),
            tick_ms: default_tick_ms(),
            pickup_lat: default_pickup_lat(),
            pickup_lng: default_pickup_lng(),
            destination_lat: default_destination_lat(),
            destination_lng: default_destination_lng(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            default: default_url_provider(),
            providers: default_url_providers(),
        }
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific path, creating it if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

            let config: Config = toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Check values that serde cannot check on its own
    pub fn validate(&self) -> Result<()> {
        if self.simulation.segments == 0 {
            return Err(Error::Config(
                "simulation.segments must be at least 1".to_string(),
            ));
        }
        if self.simulation.segments > MAX_SEGMENTS {
            return Err(Error::Config(format!(
                "simulation.segments must be at most {}",
                MAX_SEGMENTS
            )));
        }
        if self.simulation.tick_ms == 0 {
            return Err(Error::Config(
                "simulation.tick_ms must be positive".to_string(),
            ));
        }
        self.default_pickup()?;
        self.default_destination()?;
        self.fixed_device_position()?;
        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["geocoder", "base_url"] => Some(self.geocoder.base_url.clone()),
            ["geocoder", "user_agent"] => Some(self.geocoder.user_agent.clone()),
            ["geocoder", "timeout_secs"] => Some(self.geocoder.timeout_secs.to_string()),

            ["device", "source"] => Some(self.device.source.to_string()),
            ["device", "fixed_lat"] => Some(self.device.fixed_lat.to_string()),
            ["device", "fixed_lng"] => Some(self.device.fixed_lng.to_string()),
            ["device", "timeout_secs"] => Some(self.device.timeout_secs.to_string()),

            ["simulation", "segments"] => Some(self.simulation.segments.to_string()),
            ["simulation", "tick_ms"] => Some(self.simulation.tick_ms.to_string()),
            ["simulation", "pickup_lat"] => Some(self.simulation.pickup_lat.to_string()),
            ["simulation", "pickup_lng"] => Some(self.simulation.pickup_lng.to_string()),
            ["simulation", "destination_lat"] => {
                Some(self.simulation.destination_lat.to_string())
            }
            ["simulation", "destination_lng"] => {
                Some(self.simulation.destination_lng.to_string())
            }

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["url", "default"] => Some(self.url.default.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Returns error if key is invalid or the value does not parse. The
    /// resulting config is validated before the change is kept.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut updated = self.clone();
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["geocoder", "base_url"] => updated.geocoder.base_url = value.to_string(),
            ["geocoder", "user_agent"] => updated.geocoder.user_agent = value.to_string(),
            ["geocoder", "timeout_secs"] => {
                updated.geocoder.timeout_secs = parse_value(key, value)?
            }

            ["device", "source"] => {
                updated.device.source = DeviceSource::from_str(value).map_err(Error::Config)?
            }
            ["device", "fixed_lat"] => updated.device.fixed_lat = parse_value(key, value)?,
            ["device", "fixed_lng"] => updated.device.fixed_lng = parse_value(key, value)?,
            ["device", "timeout_secs"] => updated.device.timeout_secs = parse_value(key, value)?,

            ["simulation", "segments"] => updated.simulation.segments = parse_value(key, value)?,
            ["simulation", "tick_ms"] => updated.simulation.tick_ms = parse_value(key, value)?,
            ["simulation", "pickup_lat"] => {
                updated.simulation.pickup_lat = parse_value(key, value)?
            }
            ["simulation", "pickup_lng"] => {
                updated.simulation.pickup_lng = parse_value(key, value)?
            }
            ["simulation", "destination_lat"] => {
                updated.simulation.destination_lat = parse_value(key, value)?
            }
            ["simulation", "destination_lng"] => {
                updated.simulation.destination_lng = parse_value(key, value)?
            }

            ["server", "host"] => updated.server.host = value.to_string(),
            ["server", "port"] => updated.server.port = parse_value(key, value)?,

            ["url", "default"] => updated.url.default = value.to_string(),

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "geocoder.base_url",
            "geocoder.user_agent",
            "geocoder.timeout_secs",
            "device.source",
            "device.fixed_lat",
            "device.fixed_lng",
            "device.timeout_secs",
            "simulation.segments",
            "simulation.tick_ms",
            "simulation.pickup_lat",
            "simulation.pickup_lng",
            "simulation.destination_lat",
            "simulation.destination_lng",
            "server.host",
            "server.port",
            "url.default",
        ]
    }

    /// Format a URL using the specified provider
    ///
    /// Replaces {lat} and {lng} placeholders with actual values
    pub fn format_url(&self, provider: Option<&str>, point: GeoPoint) -> Result<String> {
        let provider_name = provider.unwrap_or(&self.url.default);

        let template = self.url.providers.get(provider_name).ok_or_else(|| {
            Error::Config(format!("Unknown URL provider: {}", provider_name))
        })?;

        Ok(template
            .replace("{lat}", &point.lat().to_string())
            .replace("{lng}", &point.lng().to_string()))
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Pickup used when the form has no resolved coordinate
    pub fn default_pickup(&self) -> Result<GeoPoint> {
        GeoPoint::new(self.simulation.pickup_lat, self.simulation.pickup_lng)
    }

    /// Destination used when the form has no resolved coordinate
    pub fn default_destination(&self) -> Result<GeoPoint> {
        GeoPoint::new(self.simulation.destination_lat, self.simulation.destination_lng)
    }

    /// Coordinate reported by the fixed device source
    pub fn fixed_device_position(&self) -> Result<GeoPoint> {
        GeoPoint::new(self.device.fixed_lat, self.device.fixed_lng)
    }

    /// Simulator cadence
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.simulation.tick_ms)
    }

    /// Bound on a single device position request
    pub fn device_timeout(&self) -> Duration {
        Duration::from_secs(self.device.timeout_secs)
    }

    /// Bound on a single geocoding request
    pub fn geocoder_timeout(&self) -> Duration {
        Duration::from_secs(self.geocoder.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.geocoder.base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(config.device.source, DeviceSource::Ip);
        assert_eq!(config.simulation.segments, 20);
        assert_eq!(config.simulation.tick_ms, 100);
        assert_eq!(config.server.port, 7878);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_points_are_cairo() {
        let config = Config::default();
        let pickup = config.default_pickup().unwrap();
        let destination = config.default_destination().unwrap();

        assert_eq!((pickup.lat(), pickup.lng()), (30.0444, 31.2357));
        assert_eq!((destination.lat(), destination.lng()), (30.0626, 31.2497));
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        assert_eq!(config.get("device.source"), Some("ip".to_string()));

        config.set("device.source", "fixed").unwrap();
        assert_eq!(config.device.source, DeviceSource::Fixed);

        config.set("simulation.tick_ms", "150").unwrap();
        assert_eq!(config.get("simulation.tick_ms"), Some("150".to_string()));
        assert_eq!(config.tick(), Duration::from_millis(150));
    }

    #[test]
    fn test_get_invalid_key() {
        let config = Config::default();
        assert_eq!(config.get("invalid.key"), None);
    }

    #[test]
    fn test_set_invalid_key() {
        let mut config = Config::default();
        assert!(config.set("invalid.key", "value").is_err());
    }

    #[test]
    fn test_set_invalid_value_leaves_config_unchanged() {
        let mut config = Config::default();

        assert!(config.set("simulation.segments", "not_a_number").is_err());
        assert!(config.set("simulation.segments", "0").is_err());
        assert!(config.set("simulation.segments", "10001").is_err());
        assert!(config
            .set("simulation.segments", "18446744073709551615")
            .is_err());
        assert!(config.set("simulation.pickup_lat", "95").is_err());
        assert!(config.set("device.source", "gps").is_err());

        assert_eq!(config.simulation.segments, 20);
        assert_eq!(config.simulation.pickup_lat, 30.0444);
        assert_eq!(config.device.source, DeviceSource::Ip);
    }

    #[test]
    fn test_format_url() {
        let config = Config::default();
        let point = GeoPoint::new(30.0444, 31.2357).unwrap();

        let url = config.format_url(Some("google"), point).unwrap();
        assert_eq!(url, "https://www.google.com/maps/@30.0444,31.2357,15z");

        let url = config.format_url(None, point).unwrap();
        assert_eq!(url, "https://www.openstreetmap.org/#map=18/30.0444/31.2357");
    }

    #[test]
    fn test_format_url_unknown_provider() {
        let config = Config::default();
        let point = GeoPoint::new(0.0, 0.0).unwrap();
        assert!(config.format_url(Some("unknown"), point).is_err());
    }

    #[test]
    fn test_load_creates_default_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.simulation.segments, 20);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.set("geocoder.base_url", "http://localhost:8080").unwrap();
        config.set("simulation.segments", "40").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.geocoder.base_url, "http://localhost:8080");
        assert_eq!(loaded.simulation.segments, 40);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[simulation]\nsegments = 0\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[device]\nsource = \"denied\"\n").unwrap();
        assert_eq!(config.device.source, DeviceSource::Denied);
        assert_eq!(config.device.timeout_secs, 10);
        assert_eq!(config.server.port, 7878);
    }

    #[test]
    fn test_serialization_format() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();

        assert!(toml.contains("[geocoder]"));
        assert!(toml.contains("[device]"));
        assert!(toml.contains("[simulation]"));
        assert!(toml.contains("[url.providers]"));
    }

    #[test]
    fn test_server_addr() {
        let config = Config::default();
        assert_eq!(config.server_addr(), "127.0.0.1:7878");
    }

    #[test]
    fn test_available_keys_are_gettable() {
        let config = Config::default();
        for key in Config::available_keys() {
            assert!(config.get(key).is_some(), "key {} not readable", key);
        }
    }
}
