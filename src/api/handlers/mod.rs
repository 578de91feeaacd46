//! HTTP request handlers.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod dashboard;
pub mod health;
pub mod links;
pub mod redirect;

pub use dashboard::dashboard_handler;
pub use health::health_handler;
pub use links::create_link_handler;
pub use redirect::{REDIRECT_CACHE_CONTROL, redirect_handler};
