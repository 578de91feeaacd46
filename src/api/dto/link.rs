//! DTOs for link creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Link;

/// Request to shorten a URL on behalf of an owner.
///
/// `url` may omit its scheme; `https://` is assumed.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(length(min = 1, max = 2048, message = "url must be 1-2048 characters"))]
    pub url: String,

    #[validate(length(min = 1, max = 255, message = "owner_id must be 1-255 characters"))]
    pub owner_id: String,
}

/// A stored link as returned by the API.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: i64,
    pub owner_id: String,
    pub short_code: String,
    pub short_url: String,
    pub original_url: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn from_link(link: Link, short_url: String) -> Self {
        Self {
            id: link.id,
            owner_id: link.owner_id,
            short_code: link.short_code,
            short_url,
            original_url: link.original_url,
            click_count: link.click_count,
            created_at: link.created_at,
        }
    }
}
