//! PostgreSQL repository implementations.
//!
//! Queries are issued through SQLx with bound parameters.
//!
//! - [`PgLinkRepository`] - Link storage, lookup and click counting

pub mod pg_link_repository;

pub use pg_link_repository::PgLinkRepository;
