//! Router configuration for Web API.

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

use super::handlers::{issue_challenge, method_not_allowed, submit_contact, AppState};
use super::middleware::{create_cors_layer, security_headers};

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, config: &ServerConfig) -> Router {
    let contact_routes = Router::new()
        .route(
            "/contact",
            post(submit_contact).fallback(method_not_allowed),
        )
        .route(
            "/contact/challenge",
            get(issue_challenge).fallback(method_not_allowed),
        );

    Router::new()
        .nest("/api", contact_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(&config.cors_origins))
                .layer(middleware::from_fn(security_headers))
                .layer(DefaultBodyLimit::max(config.max_body_bytes)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// Create a router serving the built site, if the directory exists.
///
/// Unknown paths fall back to `index.html`.
pub fn create_static_router(static_path: &str) -> Option<Router> {
    let dir = Path::new(static_path);
    if !dir.is_dir() {
        tracing::warn!("Static file directory not found: {}", static_path);
        return None;
    }

    let index = dir.join("index.html");
    let serve_dir = ServeDir::new(dir).fallback(ServeFile::new(index));

    Some(Router::new().fallback_service(serve_dir))
}
