//! Catalog implementations for fetching API versions

pub mod learn;

pub use learn::LearnCatalog;
