//! Azure templates reference (learn.microsoft.com) catalog implementation
//!
//! Each resource type has a page at `<base>/<namespace>/<type>` (lowercased)
//! linking to one sub-page per API version: `href="2021-02-01/virtualnetworks"`.

use std::time::Duration;

use regex::Regex;
use tracing::{debug, warn};

use crate::config::{DEFAULT_CATALOG_BASE_URL, FETCH_TIMEOUT_MS};
use crate::version::catalog::Catalog;
use crate::version::error::CatalogError;
use crate::version::types::VersionSet;

/// Catalog implementation backed by the Azure templates reference pages
pub struct LearnCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl LearnCatalog {
    /// Creates a new LearnCatalog with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, Duration::from_millis(FETCH_TIMEOUT_MS))
    }

    /// Creates a new LearnCatalog whose requests give up after `timeout`
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("bruh")
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn resource_url(&self, namespace: &str, type_name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            namespace.to_lowercase(),
            type_name.to_lowercase()
        )
    }
}

impl Default for LearnCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_BASE_URL)
    }
}

/// Extract the API versions linked from a resource type page.
///
/// Only links ending in the (lowercased) type name count, so versions of
/// other resource types mentioned on the page are ignored.
pub fn extract_api_versions(body: &str, type_name: &str) -> Result<VersionSet, CatalogError> {
    let pattern = format!(
        r#"href="(\d{{4}}-\d{{2}}-\d{{2}}-preview|\d{{4}}-\d{{2}}-\d{{2}})/{}""#,
        regex::escape(&type_name.to_lowercase())
    );
    let re = Regex::new(&pattern).unwrap();

    let versions: Vec<String> = re
        .captures_iter(body)
        .map(|caps| caps[1].to_string())
        .collect();

    VersionSet::from_unsorted(versions)
        .ok_or_else(|| CatalogError::NoVersionsFound(type_name.to_string()))
}

#[async_trait::async_trait]
impl Catalog for LearnCatalog {
    async fn fetch_versions(
        &self,
        namespace: &str,
        type_name: &str,
    ) -> Result<VersionSet, CatalogError> {
        let url = self.resource_url(namespace, type_name);
        debug!("Fetching API versions from {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(format!("{}/{}", namespace, type_name)));
        }

        if !status.is_success() {
            warn!("Catalog returned status {}: {}", status, url);
            return Err(CatalogError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;

        extract_api_versions(&body, type_name)
            .inspect_err(|_| warn!("No API versions for {}/{} in {}", namespace, type_name, url))
    }
}
