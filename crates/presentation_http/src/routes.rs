//! Route definitions

use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, Method},
    routing::get,
};
use infrastructure::ServerConfig;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{Span, info_span, warn};
use uuid::Uuid;

use crate::{handlers, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Observations
        .route("/metars/{identifier}", get(handlers::metars::get_metars))
        .with_state(state)
}

/// Wrap the router in request tracing and, when enabled, CORS
///
/// Layer order: first added = innermost.
pub fn with_middleware(router: Router, config: &ServerConfig) -> Router {
    let router = router.layer(TraceLayer::new_for_http().make_span_with(request_span));

    match cors_layer(config) {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

fn request_span(request: &Request) -> Span {
    info_span!(
        "http_request",
        request_id = %Uuid::new_v4(),
        method = %request.method(),
        uri = %request.uri().path(),
    )
}

/// Build the CORS layer from configuration
///
/// An empty origin list allows any origin.
pub fn cors_layer(config: &ServerConfig) -> Option<CorsLayer> {
    if !config.cors_enabled {
        return None;
    }

    let layer = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers(Any);

    if config.allowed_origins.is_empty() {
        return Some(layer.allow_origin(Any));
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring unparsable CORS origin");
                None
            },
        })
        .collect();
    Some(layer.allow_origin(origins))
}
