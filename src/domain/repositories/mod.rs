//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations. The PostgreSQL
//! implementation lives in `crate::infrastructure::persistence`; mock
//! implementations are generated via `mockall` for unit tests.

pub mod link_repository;

pub use link_repository::{IncrementOutcome, LinkRepository};

#[cfg(test)]
pub use link_repository::MockLinkRepository;
