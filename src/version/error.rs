use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("Resource type not found: {0}")]
    NotFound(String),

    #[error("No API versions found for {0}")]
    NoVersionsFound(String),
}
