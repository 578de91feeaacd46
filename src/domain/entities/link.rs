//! Link entity representing a short code to URL mapping.

use chrono::{DateTime, Duration, Utc};

/// A persisted short link.
///
/// Every field except `click_count` is immutable after creation.
/// `click_count` only ever grows, and only through visit recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: i64,
    pub owner_id: String,
    pub short_code: String,
    pub original_url: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        owner_id: String,
        short_code: String,
        original_url: String,
        click_count: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner_id,
            short_code,
            original_url,
            click_count,
            created_at,
        }
    }

    /// Returns true if the link was created within `window` before `now`.
    pub fn created_within(&self, window: Duration, now: DateTime<Utc>) -> bool {
        self.created_at >= now - window
    }
}

/// Input data for creating a new link.
///
/// `click_count` starts at zero and `created_at` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub owner_id: String,
    pub short_code: String,
    pub original_url: String,
}
