//! Catalog resolution for the references of one file

use futures::future::join_all;
use indexmap::IndexMap;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::parser::types::ResourceReference;
use crate::pipeline::error::PipelineError;
use crate::version::catalog::Catalog;
use crate::version::selector::SelectionPolicy;

/// Fetch versions for every distinct resource type and apply the policy
///
/// Each distinct type (compared case-insensitively, as the catalog is) is
/// fetched once; lookups run concurrently, bounded by `fetch_permits`.
/// Resolved references get their `available_versions` and
/// `selected_version`; references whose lookup failed are left untouched.
///
/// Returns one error per failed resource type, in order of first appearance.
pub async fn resolve_references(
    catalog: &dyn Catalog,
    fetch_permits: &Semaphore,
    references: &mut [ResourceReference],
    policy: SelectionPolicy,
) -> Vec<PipelineError> {
    let mut distinct: IndexMap<String, (String, String)> = IndexMap::new();
    for reference in references.iter() {
        distinct
            .entry(reference.type_id().to_lowercase())
            .or_insert_with(|| (reference.namespace.clone(), reference.type_name.clone()));
    }
    debug!(
        "Resolving {} distinct resource types for {} references",
        distinct.len(),
        references.len()
    );

    let futures = distinct.iter().map(|(key, (namespace, type_name))| async move {
        let _permit = fetch_permits.acquire().await.ok();
        let result = catalog.fetch_versions(namespace, type_name).await;
        (key, namespace, type_name, result)
    });

    let mut failures = Vec::new();

    for (key, namespace, type_name, result) in join_all(futures).await {
        let type_id = format!("{}/{}", namespace, type_name);
        match result {
            Ok(versions) => {
                let selected = policy.select(&versions);
                debug!(
                    "Selected {} for {} out of {} versions",
                    selected,
                    type_id,
                    versions.versions().len()
                );

                for reference in references
                    .iter_mut()
                    .filter(|r| r.type_id().to_lowercase() == *key)
                {
                    reference.selected_version = Some(selected.to_string());
                    reference.available_versions = Some(versions.clone());
                }
            }
            Err(source) => {
                warn!("Failed to fetch versions for {}: {}", type_id, source);
                failures.push(PipelineError::Catalog { type_id, source });
            }
        }
    }

    failures
}
