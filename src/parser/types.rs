//! Common types for parsers

use std::path::PathBuf;

use crate::version::types::VersionSet;

/// Information about a resource declaration found in a template file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceReference {
    /// Resource provider namespace (e.g., "Microsoft.Network")
    pub namespace: String,
    /// Resource type name (e.g., "virtualNetworks")
    pub type_name: String,
    /// API version pinned in the file (e.g., "2021-02-01" or "2021-02-01-preview")
    pub current_version: String,
    /// Line number (0-indexed)
    pub line: usize,
    /// Column of the reference start (byte offset within the line, 0-indexed)
    pub column: usize,
    /// Versions known to the catalog, newest first
    pub available_versions: Option<VersionSet>,
    /// Version chosen by the selection policy
    pub selected_version: Option<String>,
}

impl ResourceReference {
    pub fn new(
        namespace: impl Into<String>,
        type_name: impl Into<String>,
        current_version: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            type_name: type_name.into(),
            current_version: current_version.into(),
            line,
            column,
            available_versions: None,
            selected_version: None,
        }
    }

    /// Resource type identifier as written (e.g., "Microsoft.Network/virtualNetworks")
    pub fn type_id(&self) -> String {
        format!("{}/{}", self.namespace, self.type_name)
    }

    /// Full token as it appears in the file (e.g., "Microsoft.Web/sites@2022-03-01")
    pub fn token(&self) -> String {
        format!("{}@{}", self.type_id(), self.current_version)
    }

    /// Selected version when it differs from the pinned one
    pub fn pending_update(&self) -> Option<&str> {
        self.selected_version
            .as_deref()
            .filter(|selected| *selected != self.current_version)
    }

    pub fn status(&self) -> ReferenceStatus {
        match self.selected_version.as_deref() {
            None => ReferenceStatus::Unresolved,
            Some(selected) if selected == self.current_version => ReferenceStatus::UpToDate,
            Some(_) => ReferenceStatus::Outdated,
        }
    }
}

/// Status of a reference after resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceStatus {
    /// Pinned version equals the selected version
    UpToDate,
    /// A different version was selected
    Outdated,
    /// The catalog lookup failed or has not run
    Unresolved,
}

/// A template file and the references found in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    pub path: PathBuf,
    pub references: Vec<ResourceReference>,
}

impl TemplateFile {
    pub fn new(path: impl Into<PathBuf>, references: Vec<ResourceReference>) -> Self {
        Self {
            path: path.into(),
            references,
        }
    }

    /// References whose selected version differs from the pinned one
    pub fn outdated(&self) -> impl Iterator<Item = &ResourceReference> {
        self.references
            .iter()
            .filter(|r| r.status() == ReferenceStatus::Outdated)
    }
}

/// A directory tree and the template files discovered in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDirectory {
    pub root: PathBuf,
    pub files: Vec<TemplateFile>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn reference(current: &str, selected: Option<&str>) -> ResourceReference {
        let mut reference = ResourceReference::new("Microsoft.Web", "sites", current, 0, 0);
        reference.selected_version = selected.map(str::to_string);
        reference
    }

    #[test]
    fn type_id_and_token_join_parts() {
        let reference = reference("2019-08-01", None);

        assert_eq!(reference.type_id(), "Microsoft.Web/sites");
        assert_eq!(reference.token(), "Microsoft.Web/sites@2019-08-01");
    }

    #[rstest]
    #[case("2019-08-01", None, ReferenceStatus::Unresolved)]
    #[case("2019-08-01", Some("2019-08-01"), ReferenceStatus::UpToDate)]
    #[case("2019-08-01", Some("2022-03-01"), ReferenceStatus::Outdated)]
    #[case("2022-03-01-preview", Some("2022-03-01"), ReferenceStatus::Outdated)]
    fn status_compares_versions_as_strings(
        #[case] current: &str,
        #[case] selected: Option<&str>,
        #[case] expected: ReferenceStatus,
    ) {
        assert_eq!(reference(current, selected).status(), expected);
    }

    #[test]
    fn pending_update_is_none_when_versions_match() {
        assert_eq!(reference("2019-08-01", Some("2019-08-01")).pending_update(), None);
        assert_eq!(
            reference("2019-08-01", Some("2022-03-01")).pending_update(),
            Some("2022-03-01")
        );
    }
}
