//! Parser layer
//! - traits.rs: Parser trait definition and path errors
//! - types.rs: Common types (ResourceReference, TemplateFile, TemplateDirectory)
//! - bicep.rs: Bicep template parser

pub mod bicep;
pub mod traits;
pub mod types;

pub use bicep::BicepParser;
pub use traits::{ParseError, Parser};
pub use types::{ReferenceStatus, ResourceReference, TemplateDirectory, TemplateFile};
