//! Common types for the version layer

use crate::version::api_version::compare_recency;

/// API versions known for one resource type, newest first.
///
/// Never empty: construction from zero tokens yields `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSet {
    versions: Vec<String>,
}

impl VersionSet {
    /// Sorts the tokens by recency and drops duplicates
    pub fn from_unsorted(mut versions: Vec<String>) -> Option<Self> {
        if versions.is_empty() {
            return None;
        }

        versions.sort_by(|a, b| compare_recency(a, b));
        versions.dedup();

        Some(Self { versions })
    }

    /// The most recent version
    pub fn latest(&self) -> &str {
        &self.versions[0]
    }

    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.versions.iter().map(String::as_str)
    }

    pub fn contains(&self, version: &str) -> bool {
        self.iter().any(|v| v == version)
    }
}
