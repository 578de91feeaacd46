//! Link creation: URL normalization and short code allocation.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{
    DEFAULT_CODE_LENGTH, LONG_CODE_LENGTH, MIN_CODE_LENGTH, generate_candidate,
    is_reserved_code, timestamp_candidate,
};
use crate::utils::url_normalizer::normalize_url;

/// Number of default-length candidates tried before escalating.
const MAX_SHORT_ATTEMPTS: usize = 10;

/// Service for creating shortened links.
///
/// Allocation checks candidates against the store before inserting, but the
/// insert itself is the arbiter: a concurrent allocator can still claim the
/// same code between the check and the insert, which surfaces as
/// [`AppError::AllocationConflict`].
pub struct LinkService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service.
    pub fn new(link_repository: Arc<L>) -> Self {
        Self { link_repository }
    }

    /// Creates a short link for `raw_url` owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidUrl`] if the URL does not normalize to an
    /// absolute URL, and [`AppError::InvalidRequest`] if `owner_id` is blank.
    /// Both are raised before any store access.
    ///
    /// Returns [`AppError::AllocationConflict`] if the insert lost a race for
    /// the allocated code; callers may retry the whole call.
    ///
    /// Returns [`AppError::Persistence`] on any other store failure.
    pub async fn create_link(&self, raw_url: &str, owner_id: &str) -> Result<Link, AppError> {
        let original_url = normalize_url(raw_url).map_err(|e| AppError::invalid_url(e.to_string()))?;

        let owner_id = owner_id.trim();
        if owner_id.is_empty() {
            return Err(AppError::invalid_request("owner_id must not be empty"));
        }

        let short_code = self.allocate_unique_code().await?;

        let new_link = NewLink {
            owner_id: owner_id.to_string(),
            short_code,
            original_url,
        };

        let link = self.link_repository.create(new_link).await.map_err(|e| {
            if let AppError::AllocationConflict(code) = &e {
                tracing::warn!(short_code = %code, "Short code claimed by a concurrent insert");
            }
            e
        })?;

        tracing::info!(
            short_code = %link.short_code,
            owner_id = %link.owner_id,
            "Link created"
        );

        Ok(link)
    }

    /// Finds a short code that is not yet in the store.
    ///
    /// # Strategy
    ///
    /// 1. Up to 10 random 6-character candidates, each checked for existence
    /// 2. One random 8-character candidate, checked once
    /// 3. A timestamp-derived candidate, returned without a final check
    ///
    /// The third stage is treated as effectively unique. A collision there is
    /// left for the insert's uniqueness constraint to reject.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if an existence check fails.
    pub async fn allocate_unique_code(&self) -> Result<String, AppError> {
        for _ in 0..MAX_SHORT_ATTEMPTS {
            let candidate = generate_candidate(DEFAULT_CODE_LENGTH);
            if candidate.len() < MIN_CODE_LENGTH {
                continue;
            }

            if self.is_available(&candidate).await? {
                return Ok(candidate);
            }
        }

        tracing::warn!(
            attempts = MAX_SHORT_ATTEMPTS,
            "Short candidates exhausted, trying a longer code"
        );
        metrics::counter!("linkforge_allocation_fallbacks_total", "stage" => "long").increment(1);

        let candidate = generate_candidate(LONG_CODE_LENGTH);
        if self.is_available(&candidate).await? {
            return Ok(candidate);
        }

        let millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        let candidate = timestamp_candidate(millis);

        tracing::warn!(short_code = %candidate, "Falling back to timestamp-derived code");
        metrics::counter!("linkforge_allocation_fallbacks_total", "stage" => "timestamp")
            .increment(1);

        Ok(candidate)
    }

    /// Reserved route segments count as taken without a store lookup.
    async fn is_available(&self, candidate: &str) -> Result<bool, AppError> {
        if is_reserved_code(candidate) {
            return Ok(false);
        }

        Ok(!self.link_repository.exists(candidate).await?)
    }
}
