//! Application layer services implementing business logic.
//!
//! Services consume the [`crate::domain::repositories::LinkRepository`] trait
//! and provide a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - URL normalization and short code allocation
//! - [`services::redirect_service::RedirectService`] - Code resolution and visit counting
//! - [`services::dashboard_service::DashboardService`] - Per-owner listing and statistics

pub mod services;
