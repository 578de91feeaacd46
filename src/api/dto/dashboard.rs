//! DTOs for the owner dashboard.

use serde::Serialize;

use super::link::LinkResponse;
use crate::application::services::DashboardStats;

/// Summary figures over an owner's links.
#[derive(Debug, Serialize)]
pub struct DashboardStatsResponse {
    pub total_links: usize,
    pub total_clicks: i64,
    pub links_last_7_days: usize,
}

impl From<DashboardStats> for DashboardStatsResponse {
    fn from(stats: DashboardStats) -> Self {
        Self {
            total_links: stats.total_links,
            total_clicks: stats.total_clicks,
            links_last_7_days: stats.links_last_7_days,
        }
    }
}

/// Owner dashboard: summary plus links, newest first.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub owner_id: String,
    pub stats: DashboardStatsResponse,
    pub links: Vec<LinkResponse>,
}
