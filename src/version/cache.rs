//! Per-run memoization of catalog lookups
//!
//! A directory run may reference the same resource type from many files.
//! [`CachedCatalog`] remembers every successful lookup for as long as the
//! wrapper lives; failures are not remembered.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::version::catalog::Catalog;
use crate::version::error::CatalogError;
use crate::version::types::VersionSet;

pub struct CachedCatalog {
    inner: Arc<dyn Catalog>,
    entries: Mutex<HashMap<String, VersionSet>>,
}

impl CachedCatalog {
    pub fn new(inner: Arc<dyn Catalog>) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, VersionSet>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn key(namespace: &str, type_name: &str) -> String {
        format!("{}/{}", namespace.to_lowercase(), type_name.to_lowercase())
    }
}

#[async_trait::async_trait]
impl Catalog for CachedCatalog {
    async fn fetch_versions(
        &self,
        namespace: &str,
        type_name: &str,
    ) -> Result<VersionSet, CatalogError> {
        let key = Self::key(namespace, type_name);

        let cached = self.entries().get(&key).cloned();
        if let Some(versions) = cached {
            debug!("Using cached versions for {}", key);
            return Ok(versions);
        }

        let versions = self.inner.fetch_versions(namespace, type_name).await?;
        self.entries().insert(key, versions.clone());

        Ok(versions)
    }
}
