//! Handlers for the authenticated short URL management endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection, rejection::PathRejection},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::short_url::{CreateShortUrlRequest, MessageResponse, ShortUrlResponse};
use crate::domain::entities::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL for the authenticated user.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// Runs after the auth and rate limit layers, so an unauthenticated or
/// throttled request never reaches body validation. When the user already owns
/// three records, the oldest is evicted as part of the same insertion.
///
/// # Request Body
///
/// ```json
/// { "long_url": "https://example.com/some/page" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "id": 42,
///   "long_url": "https://example.com/some/page",
///   "short_code": "Xk3_9aQw-L0p",
///   "short_url": "http://localhost:3000/Xk3_9aQw-L0p",
///   "created_at": "2026-01-01T12:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the body is malformed or `long_url` is missing or invalid.
pub async fn create_short_url_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    payload: Result<Json<CreateShortUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortUrlResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let long_url = payload.long_url.unwrap_or_default();

    let record = state
        .short_url_service
        .create_short_url(&user.owner, &long_url)
        .await?;

    let short_url = state.short_url_service.short_url_for(&record.short_code);

    Ok((
        StatusCode::CREATED,
        Json(ShortUrlResponse::from_record(record, short_url)),
    ))
}

/// Lists the authenticated user's short URLs, newest first.
///
/// # Endpoint
///
/// `GET /api/my-urls`
pub async fn list_short_urls_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<ShortUrlResponse>>, AppError> {
    let records = state.short_url_service.list_short_urls(&user.owner).await?;

    let items = records
        .into_iter()
        .map(|record| {
            let short_url = state.short_url_service.short_url_for(&record.short_code);
            ShortUrlResponse::from_record(record, short_url)
        })
        .collect();

    Ok(Json(items))
}

/// Deletes one of the authenticated user's short URLs.
///
/// # Endpoint
///
/// `DELETE /api/url/{id}`
///
/// # Errors
///
/// Returns 404 Not Found when the id does not exist, belongs to another user,
/// or is not a number.
pub async fn delete_short_url_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(id) = id.map_err(|e| {
        AppError::not_found(
            "URL not found or unauthorized",
            json!({ "reason": e.body_text() }),
        )
    })?;

    state
        .short_url_service
        .delete_short_url(id, &user.owner)
        .await?;

    Ok(Json(MessageResponse::new("URL deleted successfully")))
}
