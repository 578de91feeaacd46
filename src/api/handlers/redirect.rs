//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::state::AppState;

/// Cache directive sent with every redirect.
pub const REDIRECT_CACHE_CONTROL: &str = "public, max-age=3600";

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}` (also mounted at `GET /redirect/{code}`)
///
/// # Request Flow
///
/// 1. Resolve the code (normalized, read-only lookup)
/// 2. Build a 301 response with `Location` and a one-hour public cache directive
/// 3. Spawn the visit counter as a detached task and return without awaiting it
///
/// A failed resolution never records a visit. A failed visit record never
/// changes the response.
///
/// # Errors
///
/// Returns 400 Bad Request if the code normalizes to fewer than 3 characters.
/// Returns 404 Not Found if the code doesn't exist.
/// Returns 500 Internal Server Error on store failures or an unusable URL.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let link = state.redirect_service.resolve(&code).await?;

    let location = HeaderValue::from_str(&link.original_url).map_err(|e| {
        AppError::internal(format!(
            "Stored URL for '{}' is not a valid header value: {e}",
            link.short_code
        ))
    })?;

    let redirect_service = state.redirect_service.clone();
    let short_code = link.short_code;
    tokio::spawn(async move {
        redirect_service.record_visit(&short_code).await;
    });

    Ok((
        StatusCode::MOVED_PERMANENTLY,
        [
            (header::LOCATION, location),
            (
                header::CACHE_CONTROL,
                HeaderValue::from_static(REDIRECT_CACHE_CONTROL),
            ),
        ],
    )
        .into_response())
}
