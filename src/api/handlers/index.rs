//! Handler listing the available API routes.

use axum::{Json, extract::State};

use crate::api::dto::index::{ApiIndexResponse, RouteInfo};
use crate::domain::entities::OWNER_URL_CAP;
use crate::infrastructure::rate_limit::RateLimitedAction;
use crate::state::AppState;

/// Describes the public HTTP surface, including the configured creation quota.
///
/// # Endpoint
///
/// `GET /api`
pub async fn api_index_handler(State(state): State<AppState>) -> Json<ApiIndexResponse> {
    let creates_per_minute = state
        .rate_limiter
        .quota_per_minute(RateLimitedAction::CreateShortUrl);

    Json(ApiIndexResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        routes: vec![
            RouteInfo {
                method: "POST",
                path: "/api/shorten",
                auth: true,
                description: format!(
                    "Create a short URL ({} per minute per user, {} kept per user)",
                    creates_per_minute, OWNER_URL_CAP
                ),
            },
            RouteInfo {
                method: "GET",
                path: "/api/my-urls",
                auth: true,
                description: "List your short URLs, newest first".to_string(),
            },
            RouteInfo {
                method: "DELETE",
                path: "/api/url/{id}",
                auth: true,
                description: "Delete one of your short URLs".to_string(),
            },
            RouteInfo {
                method: "GET",
                path: "/{code}",
                auth: false,
                description: "Redirect to the long URL".to_string(),
            },
            RouteInfo {
                method: "GET",
                path: "/health",
                auth: false,
                description: "Service health".to_string(),
            },
        ],
    })
}
