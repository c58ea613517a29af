//! Version selection policy
//!
//! Picks the version a reference should be moved to from a [`VersionSet`].

use tracing::warn;

use crate::version::api_version::is_preview;
use crate::version::types::VersionSet;

/// Policy deciding which catalog version to adopt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionPolicy {
    /// Allow pre-release (`-preview`) versions to be selected
    pub include_preview: bool,
}

impl SelectionPolicy {
    pub fn new(include_preview: bool) -> Self {
        Self { include_preview }
    }

    /// Select the version to adopt.
    ///
    /// With previews included this is the newest version. Otherwise it is the
    /// newest stable version; when the set holds only previews the newest
    /// preview is returned anyway.
    pub fn select<'a>(&self, versions: &'a VersionSet) -> &'a str {
        if self.include_preview {
            return versions.latest();
        }

        versions
            .iter()
            .find(|v| !is_preview(v))
            .unwrap_or_else(|| {
                let latest = versions.latest();
                warn!("No stable version available, falling back to {}", latest);
                latest
            })
    }
}
