//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::{
    CountingMode, DashboardService, LinkService, RedirectService,
};
use crate::domain::repositories::LinkRepository;

/// Application state shared by all handlers.
///
/// Services hold the repository behind a trait object so the same router can
/// run against PostgreSQL or any other [`LinkRepository`].
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    pub redirect_service: Arc<RedirectService<dyn LinkRepository>>,
    pub dashboard_service: Arc<DashboardService<dyn LinkRepository>>,
    pub link_repository: Arc<dyn LinkRepository>,
    /// Base used to build `short_url` values, without a trailing slash.
    pub public_base_url: String,
}

impl AppState {
    /// Wires every service over a single repository.
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        counting_mode: CountingMode,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            link_service: Arc::new(LinkService::new(link_repository.clone())),
            redirect_service: Arc::new(RedirectService::new(
                link_repository.clone(),
                counting_mode,
            )),
            dashboard_service: Arc::new(DashboardService::new(link_repository.clone())),
            link_repository,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Builds the public short URL for a code.
    pub fn short_url(&self, short_code: &str) -> String {
        format!("{}/{}", self.public_base_url, short_code)
    }
}
