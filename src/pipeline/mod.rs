//! Resolution and rewrite pipeline
//!
//! # Modules
//!
//! - [`resolve`]: Catalog lookups and version selection for one file's references
//! - [`rewrite`]: Token substitution and writing (in place or side by side)
//! - [`directory`]: Concurrent orchestration over a file or directory tree
//! - [`error`]: Error type covering every stage

pub mod directory;
pub mod error;
pub mod resolve;
pub mod rewrite;

pub use directory::{Action, Outcome, Pipeline, PipelineOptions};
pub use error::PipelineError;
pub use rewrite::WriteMode;
