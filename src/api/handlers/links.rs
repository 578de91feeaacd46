//! Handler for link creation.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::link::{CreateLinkRequest, LinkResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// { "url": "example.com/page", "owner_id": "user-1" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "id": 1,
///   "owner_id": "user-1",
///   "short_code": "k3x9qa",
///   "short_url": "https://lnk.example/k3x9qa",
///   "original_url": "https://example.com/page",
///   "click_count": 0,
///   "created_at": "2026-01-01T00:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for an invalid URL or request body.
/// Returns 409 Conflict if a concurrent creation claimed the same code; the
/// request can be retried as-is.
/// Returns 500 Internal Server Error on store failures.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_link(&payload.url, &payload.owner_id)
        .await?;

    let short_url = state.short_url(&link.short_code);

    Ok((
        StatusCode::CREATED,
        Json(LinkResponse::from_link(link, short_url)),
    ))
}
