use std::path::PathBuf;

use thiserror::Error;

use crate::parser::traits::ParseError;
use crate::version::error::CatalogError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    InvalidPath(#[from] ParseError),

    #[error("Failed to resolve {type_id}: {source}")]
    Catalog {
        type_id: String,
        #[source]
        source: CatalogError,
    },

    #[error("Failed to rewrite {path:?}: {source}")]
    Rewrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Worker task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
