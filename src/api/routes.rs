//! API route configuration.
//!
//! All routes here require Bearer token authentication via
//! [`crate::api::middleware::auth`], applied by the top-level router.

use crate::api::handlers::{
    create_short_url_handler, delete_short_url_handler, list_short_urls_handler,
};
use crate::api::middleware::rate_limit;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

/// Authenticated API routes.
///
/// # Endpoints
///
/// - `POST   /shorten`    - Create a short URL (rate limited per user)
/// - `GET    /my-urls`    - List the caller's short URLs
/// - `DELETE /url/{id}`   - Delete one of the caller's short URLs
pub fn protected_routes(state: AppState) -> Router<AppState> {
    let create = Router::new()
        .route("/shorten", post(create_short_url_handler))
        .route_layer(middleware::from_fn_with_state(
            state,
            rate_limit::create_layer,
        ));

    Router::new()
        .merge(create)
        .route("/my-urls", get(list_short_urls_handler))
        .route("/url/{id}", delete(delete_short_url_handler))
}
