//! API route configuration.

use crate::api::handlers::{create_link_handler, dashboard_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Link creation and owner dashboard routes.
///
/// # Endpoints
///
/// - `POST /links`                   - Create a short link
/// - `GET  /owners/{owner_id}/links` - Owner dashboard
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/links", post(create_link_handler))
        .route("/owners/{owner_id}/links", get(dashboard_handler))
}
