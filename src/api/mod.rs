//! REST API module for the worldgen server
//!
//! This module provides the HTTP endpoints the game client calls to generate,
//! render and advance its world. Every game endpoint is a thin wrapper over
//! one [`Gateway`] operation.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;

use std::path::Path;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::gateway::Gateway;

/// Shared API state
#[derive(Clone)]
pub struct ApiState {
    /// Prompt gateway shared by all requests
    pub gateway: Arc<Gateway>,
}

impl ApiState {
    /// Create a new API state
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }
}

/// Create the API router with all endpoints
///
/// When `static_dir` is given its files are served under `/static`.
pub fn create_router(state: ApiState, static_dir: Option<&Path>) -> Router {
    let api_routes = Router::new()
        .route("/gen_world", get(handlers::gen_world))
        .route("/render_object", post(handlers::render_object))
        .route("/interact", post(handlers::interact))
        .route("/do_interaction", post(handlers::do_interaction))
        .route("/game_tick", post(handlers::game_tick))
        .route("/health", get(health_check));

    let mut router = Router::new().nest("/api", api_routes);

    if let Some(dir) = static_dir {
        router = router.nest_service("/static", ServeDir::new(dir));
    }

    router
        // Add CORS middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers(Any),
        )
        // Add request tracing
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        // Add state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
