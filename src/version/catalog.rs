//! Catalog trait for looking up the API versions of a resource type

#[cfg(test)]
use mockall::automock;

use crate::version::error::CatalogError;
use crate::version::types::VersionSet;

/// Trait for fetching the known API versions of a resource type
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Catalog: Send + Sync {
    /// Fetches all API versions for a resource type
    ///
    /// # Arguments
    /// * `namespace` - Resource provider namespace (e.g., "Microsoft.Network")
    /// * `type_name` - Resource type name (e.g., "virtualNetworks")
    ///
    /// # Returns
    /// * `Ok(VersionSet)` - Non-empty list of versions, newest first
    /// * `Err(CatalogError)` - If the fetch fails or yields no versions
    async fn fetch_versions(
        &self,
        namespace: &str,
        type_name: &str,
    ) -> Result<VersionSet, CatalogError>;
}
