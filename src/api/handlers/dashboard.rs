//! Handler for the owner dashboard.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::dashboard::DashboardResponse;
use crate::api::dto::link::LinkResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Lists an owner's links with summary statistics.
///
/// # Endpoint
///
/// `GET /api/owners/{owner_id}/links`
///
/// # Response
///
/// ```json
/// {
///   "owner_id": "user-1",
///   "stats": { "total_links": 2, "total_clicks": 7, "links_last_7_days": 1 },
///   "links": [ { "short_code": "k3x9qa", "...": "..." } ]
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if `owner_id` is blank.
/// Returns 500 Internal Server Error on store failures.
pub async fn dashboard_handler(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
) -> Result<Json<DashboardResponse>, AppError> {
    let dashboard = state.dashboard_service.dashboard(&owner_id).await?;

    let links = dashboard
        .links
        .into_iter()
        .map(|link| {
            let short_url = state.short_url(&link.short_code);
            LinkResponse::from_link(link, short_url)
        })
        .collect();

    Ok(Json(DashboardResponse {
        owner_id: owner_id.trim().to_string(),
        stats: dashboard.stats.into(),
        links,
    }))
}
