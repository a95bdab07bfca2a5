//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`      - Short URL redirect (public)
//! - `GET  /health`      - Health check: database and cache (public)
//! - `GET  /api`         - Route listing (public)
//! - `/api/*`            - Short URL management (Bearer token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Authentication** - Bearer token on `/api/*` management routes
//! - **Rate limiting** - Per-user quota on creation, after authentication
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{api_index_handler, health_handler, redirect_handler};
use crate::api::middleware::{auth, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}

/// Routes and middleware without path normalization.
///
/// Suitable for in-process testing where requests use canonical paths.
pub fn router(state: AppState) -> Router {
    let api_router = api::routes::protected_routes(state.clone())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .route("/", get(api_index_handler));

    Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer())
}
