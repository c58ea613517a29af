//! Catalog test utilities

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use bruh::pipeline::{Action, Pipeline, PipelineOptions};
use bruh::version::catalog::Catalog;
use bruh::version::error::CatalogError;
use bruh::version::selector::SelectionPolicy;
use bruh::version::types::VersionSet;

/// In-memory catalog keyed by resource type id ("Microsoft.Web/sites")
#[derive(Default)]
pub struct StaticCatalog {
    versions: HashMap<String, Vec<String>>,
    calls: AtomicUsize,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_versions(mut self, type_id: &str, versions: Vec<&str>) -> Self {
        self.versions.insert(
            type_id.to_string(),
            versions.into_iter().map(|v| v.to_string()).collect(),
        );
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Catalog for StaticCatalog {
    async fn fetch_versions(
        &self,
        namespace: &str,
        type_name: &str,
    ) -> Result<VersionSet, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let type_id = format!("{}/{}", namespace, type_name);
        match self.versions.get(&type_id) {
            Some(versions) => VersionSet::from_unsorted(versions.clone())
                .ok_or(CatalogError::NoVersionsFound(type_id)),
            None => Err(CatalogError::NotFound(type_id)),
        }
    }
}

/// Catalog with the resource types used by the fixtures
pub fn azure_catalog() -> StaticCatalog {
    StaticCatalog::new()
        .with_versions(
            "Microsoft.Web/sites",
            vec!["2019-08-01", "2021-02-01", "2022-03-01", "2022-09-01-preview"],
        )
        .with_versions(
            "Microsoft.Web/serverfarms",
            vec!["2020-06-01", "2022-03-01"],
        )
        .with_versions(
            "Microsoft.Resources/resourceGroups",
            vec!["2021-01-01", "2021-04-01"],
        )
}

pub fn create_pipeline(catalog: Arc<dyn Catalog>, action: Action) -> Pipeline {
    Pipeline::new(
        catalog,
        PipelineOptions::new(action, SelectionPolicy::default()),
    )
}
