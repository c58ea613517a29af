//! Version layer for API version lookup and selection
//!
//! This module fetches the API versions a resource type is published with,
//! orders them by recency and picks the one a reference should move to.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Catalog   │────▶│ VersionSet  │────▶│  Selector   │
//! │   (fetch)   │     │  (ordered)  │     │  (policy)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                   │
//!        ▼                   ▼
//! ┌─────────────┐     ┌─────────────┐
//! │  Catalogs   │     │ ApiVersion  │
//! │   (learn)   │     │ (ordering)  │
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`catalog`]: Catalog trait for fetching versions of a resource type
//! - [`catalogs`]: Concrete catalog implementations (Azure templates reference)
//! - [`cache`]: Per-run memoization wrapper around a catalog
//! - [`api_version`]: Date-based ordering of API versions
//! - [`selector`]: Preview-aware version selection
//! - [`error`]: Error types for catalog operations
//! - [`types`]: Common types like `VersionSet`

pub mod api_version;
pub mod cache;
pub mod catalog;
pub mod catalogs;
pub mod error;
pub mod selector;
pub mod types;
