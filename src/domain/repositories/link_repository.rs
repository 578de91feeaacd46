//! Repository trait for link storage.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Result of the store's atomic click counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncrementOutcome {
    /// The matching row was incremented in a single server-side statement.
    Incremented,
    /// No row matches the code.
    NotFound,
    /// The atomic primitive is not deployed in this store.
    Unsupported,
}

/// Repository interface for the `links` table.
///
/// Every call is a direct round-trip to the store; implementations keep no
/// in-memory state between calls.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link with `click_count = 0`.
    ///
    /// The insert is the arbiter of short code uniqueness.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AllocationConflict`] if the short code is already taken.
    /// Returns [`AppError::Persistence`] on any other store error.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Returns true if a link with this short code exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on store errors.
    async fn exists(&self, short_code: &str) -> Result<bool, AppError>;

    /// Finds a link by its short code without touching `click_count`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on store errors.
    async fn find_by_code(&self, short_code: &str) -> Result<Option<Link>, AppError>;

    /// Increments `click_count` through the store's atomic primitive.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on store errors other than a missing
    /// primitive, which is reported as [`IncrementOutcome::Unsupported`].
    async fn increment_click_count(&self, short_code: &str)
    -> Result<IncrementOutcome, AppError>;

    /// Reads the current `click_count`, or `None` if no row matches.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on store errors.
    async fn get_click_count(&self, short_code: &str) -> Result<Option<i64>, AppError>;

    /// Overwrites `click_count`. Returns false if no row matches.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on store errors.
    async fn set_click_count(&self, short_code: &str, click_count: i64)
    -> Result<bool, AppError>;

    /// Lists an owner's links, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on store errors.
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Link>, AppError>;

    /// Checks that the store answers queries.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if the store is unreachable.
    async fn ping(&self) -> Result<(), AppError>;
}
