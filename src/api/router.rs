use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::chat;
use super::health;
use super::middleware::{create_cors_layer, logging_middleware};
use super::state::AppState;
use crate::config::CorsConfig;

/// Create the full router with application state
pub fn create_router(state: AppState, cors: &CorsConfig) -> Router {
    Router::new()
        // Health endpoints (no state needed)
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        // Browser-facing chat API
        .nest("/api", chat::create_chat_router())
        // Add state and middleware
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(create_cors_layer(cors))
        .layer(TraceLayer::new_for_http())
}
