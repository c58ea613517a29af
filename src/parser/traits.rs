//! Parser trait definition

use std::path::{Path, PathBuf};

use crate::parser::types::ResourceReference;

/// Trait for extracting resource references from template files
pub trait Parser: Send + Sync {
    /// Check if this parser handles the given path (by name only, no I/O)
    fn can_parse(&self, path: &Path) -> bool;

    /// Extract every resource reference in order of appearance.
    ///
    /// Content without references yields an empty list.
    fn parse(&self, content: &str) -> Vec<ResourceReference>;
}

/// Error type for locating and reading template files
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The path does not exist
    #[error("No such file or directory: {0:?}")]
    NotFound(PathBuf),

    /// A file was expected but the path is a directory
    #[error("Given path is a directory: {0:?}")]
    IsDirectory(PathBuf),

    /// The file does not carry the template extension
    #[error("Invalid file extension: {0:?}")]
    InvalidExtension(PathBuf),

    /// Stat or read failure other than a missing path
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ParseError {
    pub(crate) fn from_io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            ParseError::NotFound(path.to_path_buf())
        } else {
            ParseError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}
