//! Per-user rate limiting for mutating endpoints.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde_json::json;
use tracing::warn;

use crate::domain::entities::CurrentUser;
use crate::error::AppError;
use crate::infrastructure::rate_limit::RateLimitedAction;
use crate::state::AppState;

/// Throttles short URL creation per authenticated user.
///
/// Must run inside [`auth::layer`](super::auth::layer): the identity is read from
/// the [`CurrentUser`] extension it sets. Requests over the quota are answered
/// with `429 Too Many Requests` and never reach the handler.
///
/// # Example
///
/// ```rust,ignore
/// Router::new()
///     .route("/shorten", post(create_short_url_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit::create_layer));
/// ```
pub async fn create_layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let action = RateLimitedAction::CreateShortUrl;

    let owner = req
        .extensions()
        .get::<CurrentUser>()
        .map(|user| user.owner.clone())
        .ok_or_else(|| {
            AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    if !st.rate_limiter.allow(&owner, action) {
        warn!(owner = %owner, %action, "Rate limit exceeded");
        metrics::counter!("rate_limit_rejections_total").increment(1);
        return Err(AppError::rate_limited(json!({ "action": action.to_string() })));
    }

    Ok(next.run(req).await)
}
