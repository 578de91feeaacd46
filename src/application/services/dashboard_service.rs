//! Per-owner link listing and summary statistics.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Window used for the "recent links" figure.
const RECENT_WINDOW_DAYS: i64 = 7;

/// Summary figures over an owner's links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_links: usize,
    pub total_clicks: i64,
    pub links_last_7_days: usize,
}

/// An owner's links, newest first, with their summary.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub links: Vec<Link>,
}

impl DashboardStats {
    /// Computes summary figures relative to `now`.
    pub fn from_links(links: &[Link], now: DateTime<Utc>) -> Self {
        let window = Duration::days(RECENT_WINDOW_DAYS);

        Self {
            total_links: links.len(),
            total_clicks: links.iter().map(|l| l.click_count).sum(),
            links_last_7_days: links
                .iter()
                .filter(|l| l.created_within(window, now))
                .count(),
        }
    }
}

/// Service backing the owner dashboard.
pub struct DashboardService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
}

impl<L: LinkRepository + ?Sized> DashboardService<L> {
    /// Creates a new dashboard service.
    pub fn new(link_repository: Arc<L>) -> Self {
        Self { link_repository }
    }

    /// Loads the dashboard for `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidRequest`] if `owner_id` is blank.
    /// Returns [`AppError::Persistence`] on store errors.
    pub async fn dashboard(&self, owner_id: &str) -> Result<Dashboard, AppError> {
        let owner_id = owner_id.trim();
        if owner_id.is_empty() {
            return Err(AppError::invalid_request("owner_id must not be empty"));
        }

        let links = self.link_repository.list_by_owner(owner_id).await?;
        let stats = DashboardStats::from_links(&links, Utc::now());

        Ok(Dashboard { stats, links })
    }
}
