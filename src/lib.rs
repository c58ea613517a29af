//! bruh (Bicep Resource Update Helper)
//!
//! Finds the Azure resource references in Bicep files, looks up the API
//! versions each resource type is published with and moves every reference
//! to the version selected by a preview-aware policy.
//!
//! # Modules
//!
//! - [`parser`]: Extraction of `namespace/type@version` references
//! - [`version`]: Catalog lookups, version ordering and selection
//! - [`pipeline`]: Rewriting and concurrent file/directory orchestration
//! - [`report`]: Plain-text reports for the command line
//! - [`config`]: Constants and the JSON configuration file

pub mod config;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod version;
