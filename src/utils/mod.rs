//! Helpers shared by the allocator and the resolver.
//!
//! - [`code_generator`] - Short code normalization and random candidate generation
//! - [`url_normalizer`] - Scheme defaulting and structural URL validation
//! - [`db_error`] - Classification of Postgres errors

pub mod code_generator;
pub mod db_error;
pub mod url_normalizer;
