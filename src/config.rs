use serde::Deserialize;
use std::path::{Path, PathBuf};

// =============================================================================
// Template and catalog constants
// =============================================================================

/// Extension (without the dot) of the template files this tool handles
pub const TEMPLATE_EXTENSION: &str = "bicep";

/// Suffix inserted before the extension when writing side-by-side
pub const UPDATED_SUFFIX: &str = "_updated";

/// Suffix marking a pre-release API version
pub const PREVIEW_SUFFIX: &str = "-preview";

/// Default base URL of the Azure templates reference
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://learn.microsoft.com/en-us/azure/templates";

// =============================================================================
// Time and concurrency constants
// =============================================================================

/// Timeout for catalog fetches in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Default number of files processed at the same time
pub const DEFAULT_MAX_CONCURRENT_FILES: usize = 16;

/// Default number of catalog requests in flight at the same time
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub catalog: CatalogConfig,
    pub concurrency: ConcurrencyConfig,
}

/// Catalog-related configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogConfig {
    /// Base URL the resource pages are fetched from
    pub base_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Remember the versions of a resource type for the rest of the run
    pub cache: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_BASE_URL.to_string(),
            timeout_ms: FETCH_TIMEOUT_MS,
            cache: true,
        }
    }
}

/// Concurrency limits for directory runs
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ConcurrencyConfig {
    pub max_files: usize,
    pub max_fetches: usize,
    /// Skip files that have not started yet once one file failed
    pub fail_fast: bool,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_CONCURRENT_FILES,
            max_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            fail_fast: false,
        }
    }
}

impl Config {
    /// Loads the configuration.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// used when a file is present there, otherwise defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = config_path();
                if default_path.is_file() {
                    Self::from_file(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Returns the path to the config directory for bruh.
/// Uses $XDG_CONFIG_HOME/bruh if XDG_CONFIG_HOME is set,
/// otherwise falls back to ~/.config/bruh,
/// or ./bruh if neither is available.
pub fn config_dir() -> PathBuf {
    config_dir_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the default config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

fn config_dir_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let config_dir = xdg_config_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    config_dir.join("bruh")
}
