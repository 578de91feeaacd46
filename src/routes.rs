//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`          - Short link redirect
//! - `GET  /redirect/{code}` - Same redirect, for deployments mounted under a prefix
//! - `GET  /health`          - Store connectivity check
//! - `/api/*`                - Link creation and dashboard (rate limited)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on `/api`
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   forwarding headers instead of the peer socket address; enable only when
///   the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let api_router = if behind_proxy {
        api::routes::api_routes().layer(rate_limit::proxy_layer())
    } else {
        api::routes::api_routes().layer(rate_limit::layer())
    };

    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/redirect/{code}", get(redirect_handler))
        .route("/{code}", get(redirect_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
