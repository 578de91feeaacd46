//! Business logic services for the application layer.

pub mod dashboard_service;
pub mod link_service;
pub mod redirect_service;

pub use dashboard_service::{Dashboard, DashboardService, DashboardStats};
pub use link_service::LinkService;
pub use redirect_service::{CounterPath, CountingMode, RedirectService, VisitOutcome};
