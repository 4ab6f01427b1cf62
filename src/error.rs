//! Error types for ride-sim

use thiserror::Error;

/// Main error type for ride-sim operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Search query is empty")]
    EmptyQuery,

    #[error("Location not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Position(#[from] PositionError),

    #[error("Geocoding error: {0}")]
    Geocoding(String),

    #[error("Incomplete booking: {0}")]
    IncompleteBooking(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),
}

/// Why a device position fix could not be obtained
///
/// Each kind needs different guidance for the user, so they stay distinct.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Position unavailable")]
    PositionUnavailable,

    #[error("Position request timed out")]
    Timeout,
}

impl PositionError {
    /// User-facing notice for this failure
    pub fn notice(&self) -> &'static str {
        match self {
            Self::PermissionDenied => {
                "Unable to get your location. Please allow location access in your settings."
            }
            Self::PositionUnavailable => {
                "Unable to get your location. Location information is unavailable."
            }
            Self::Timeout => "Unable to get your location. Location request timed out. Please try again.",
        }
    }
}

/// Result type alias for ride-sim operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_notices_are_distinct() {
        let notices = [
            PositionError::PermissionDenied.notice(),
            PositionError::PositionUnavailable.notice(),
            PositionError::Timeout.notice(),
        ];
        assert_ne!(notices[0], notices[1]);
        assert_ne!(notices[1], notices[2]);
        assert!(notices[0].contains("allow location access"));
        assert!(notices[2].contains("try again"));
    }

    #[test]
    fn test_position_error_converts() {
        let err: Error = PositionError::Timeout.into();
        assert!(matches!(err, Error::Position(PositionError::Timeout)));
        assert_eq!(err.to_string(), "Position request timed out");
    }
}
