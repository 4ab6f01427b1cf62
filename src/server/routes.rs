//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::booking;
use crate::coord::GeoPoint;
use crate::error::{Error, PositionError};
use crate::format::{available_formats, FormatInfo};
use crate::geo::ResolvedLocation;
use crate::server::state::AppState;
use crate::sim::RideRequest;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/search", get(search_handler))
        .route("/api/reverse", get(reverse_handler))
        .route("/api/locate", get(locate_handler))
        .route("/api/ride", post(ride_handler))
        .route("/api/formats", get(formats_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
    #[serde(skip)]
    pub status: StatusCode,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let (status, code) = match &err {
            Error::EmptyQuery => (StatusCode::BAD_REQUEST, "EMPTY_QUERY"),
            Error::InvalidCoordinates(_) => (StatusCode::BAD_REQUEST, "INVALID_COORDINATES"),
            Error::IncompleteBooking(_) => (StatusCode::BAD_REQUEST, "INCOMPLETE_BOOKING"),
            Error::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Error::Position(PositionError::PermissionDenied) => {
                (StatusCode::FORBIDDEN, "POSITION_DENIED")
            }
            Error::Position(PositionError::PositionUnavailable) => {
                (StatusCode::SERVICE_UNAVAILABLE, "POSITION_UNAVAILABLE")
            }
            Error::Position(PositionError::Timeout) => {
                (StatusCode::GATEWAY_TIMEOUT, "POSITION_TIMEOUT")
            }
            Error::Geocoding(_) | Error::Http(_) => (StatusCode::BAD_GATEWAY, "GEOCODING_ERROR"),
            Error::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        let error = match &err {
            Error::Position(kind) => kind.notice().to_string(),
            other => other.to_string(),
        };
        ApiError {
            error,
            code: code.to_string(),
            status,
        }
    }
}

impl From<PositionError> for ApiError {
    fn from(err: PositionError) -> Self {
        Error::Position(err).into()
    }
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
    /// Geocoding service base URL
    pub geocoder: String,
    /// Configured device position source
    pub device_source: String,
    /// Uptime in seconds
    pub uptime_secs: u64,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let config = state.config.read().await;

    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        geocoder: state.resolver.geocoder().base_url().to_string(),
        device_source: config.device.source.to_string(),
        uptime_secs: state.uptime_secs(),
    })
}

/// Search query parameters
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// Forward geocoding endpoint
///
/// GET /api/search?q=...
async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ResolvedLocation>, ApiError> {
    let location = state.resolver.resolve_from_query(&params.q).await?;
    Ok(Json(location))
}

/// Reverse geocoding parameters
#[derive(Debug, Deserialize)]
pub struct ReverseParams {
    pub lat: f64,
    pub lng: f64,
}

/// Reverse geocoding endpoint
///
/// GET /api/reverse?lat=...&lng=...
///
/// Always answers with a location; an unnamed point is labelled with its
/// coordinates.
async fn reverse_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReverseParams>,
) -> Result<Json<ResolvedLocation>, ApiError> {
    let point = GeoPoint::new(params.lat, params.lng)?;
    Ok(Json(state.resolver.resolve_from_point(point).await))
}

/// Current location endpoint
///
/// GET /api/locate
async fn locate_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ResolvedLocation>, ApiError> {
    let location = state.resolver.resolve_current_location().await?;
    Ok(Json(location))
}

/// Ride request body
#[derive(Debug, Deserialize)]
pub struct RideBody {
    pub pickup: ResolvedLocation,
    pub destination: ResolvedLocation,
}

/// Ride request endpoint
///
/// POST /api/ride
async fn ride_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RideBody>,
) -> Result<Json<RideRequest>, ApiError> {
    let config = state.config.read().await;
    let ride = booking::request_ride(&body.pickup, &body.destination, &config)?;
    Ok(Json(ride))
}

/// Formats response
#[derive(Debug, Serialize, Deserialize)]
pub struct FormatsResponse {
    pub formats: Vec<FormatInfo>,
}

/// List output formats
///
/// GET /api/formats
async fn formats_handler() -> Json<FormatsResponse> {
    Json(FormatsResponse {
        formats: available_formats(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, DeviceSource};
    use crate::geo::nominatim::tests::spawn_stub;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn create_test_state(config: Config) -> Arc<AppState> {
        Arc::new(AppState::new(config).unwrap())
    }

    async fn stub_config() -> Config {
        let mut config = Config::default();
        config.geocoder.base_url = spawn_stub().await;
        config.device.source = DeviceSource::Fixed;
        config
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        app: Router,
        uri: &str,
    ) -> (StatusCode, T) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn post_ride(app: Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/ride")
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let app = create_router(create_test_state(Config::default()));

        let (status, body): (_, StatusResponse) = get_json(app, "/api/status").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.running);
        assert_eq!(body.geocoder, "https://nominatim.openstreetmap.org");
        assert_eq!(body.device_source, "ip");
    }

    #[tokio::test]
    async fn test_formats_endpoint() {
        let app = create_router(create_test_state(Config::default()));

        let (status, body): (_, FormatsResponse) = get_json(app, "/api/formats").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.formats.len(), 4);
    }

    #[tokio::test]
    async fn test_empty_search_is_rejected() {
        let app = create_router(create_test_state(Config::default()));

        let (status, err): (_, ApiError) = get_json(app, "/api/search?q=%20%20").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "EMPTY_QUERY");
    }

    #[tokio::test]
    async fn test_search_endpoint() {
        let state = create_test_state(stub_config().await);

        let (status, loc): (_, ResolvedLocation) =
            get_json(create_router(Arc::clone(&state)), "/api/search?q=Cairo").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(loc.address, "Cairo, Egypt");
        assert!(loc.point.is_some());

        let (status, err): (_, ApiError) = get_json(
            create_router(state),
            "/api/search?q=zzznonexistentplace123",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(err.code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_reverse_endpoint() {
        let state = create_test_state(stub_config().await);

        let (status, loc): (_, ResolvedLocation) = get_json(
            create_router(Arc::clone(&state)),
            "/api/reverse?lat=30.0444&lng=31.2357",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(loc.address, "Tahrir Square, Cairo, Egypt");

        // The stub has no name for the equator
        let (status, loc): (_, ResolvedLocation) =
            get_json(create_router(state), "/api/reverse?lat=0&lng=31.5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(loc.address, "0, 31.5");
    }

    #[tokio::test]
    async fn test_reverse_rejects_invalid_coordinates() {
        let app = create_router(create_test_state(Config::default()));

        let (status, err): (_, ApiError) = get_json(app, "/api/reverse?lat=100&lng=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "INVALID_COORDINATES");
    }

    #[tokio::test]
    async fn test_locate_denied() {
        let mut config = Config::default();
        config.device.source = DeviceSource::Denied;
        let app = create_router(create_test_state(config));

        let (status, err): (_, ApiError) = get_json(app, "/api/locate").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(err.code, "POSITION_DENIED");
        assert!(err.error.contains("allow location access"));
    }

    #[tokio::test]
    async fn test_locate_fixed() {
        let app = create_router(create_test_state(stub_config().await));

        let (status, loc): (_, ResolvedLocation) = get_json(app, "/api/locate").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(loc.address, "Tahrir Square, Cairo, Egypt");
        assert_eq!(loc.point, Some(GeoPoint::new(30.0444, 31.2357).unwrap()));
    }

    #[tokio::test]
    async fn test_ride_endpoint() {
        let app = create_router(create_test_state(Config::default()));

        let (status, ride) = post_ride(
            app,
            serde_json::json!({
                "pickup": {"address": "Tahrir Square", "point": {"lat": 30.0444, "lng": 31.2357}},
                "destination": {"address": "Maadi"}
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(ride["pickup"]["address"], "Tahrir Square");
        assert_eq!(ride["route"]["destination"]["lat"], 30.0626);
        assert_eq!(ride["route"]["waypoints"].as_array().unwrap().len(), 21);
    }

    #[tokio::test]
    async fn test_ride_requires_both_addresses() {
        let app = create_router(create_test_state(Config::default()));

        let (status, err) = post_ride(
            app,
            serde_json::json!({
                "pickup": {"address": "Tahrir Square"},
                "destination": {"address": ""}
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["code"], "INCOMPLETE_BOOKING");
    }
}
