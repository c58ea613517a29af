//! Bicep template parser
//!
//! Recognizes resource declarations by pattern rather than by grammar:
//! `<namespace>/<typeName>@<apiVersion>` where the API version is either
//! `YYYY-MM-DD` or `YYYY-MM-DD-preview`.
//!
//! Format examples:
//! - `resource rg 'Microsoft.Resources/resourceGroups@2021-01-01' = { ... }`
//! - `resource id 'Microsoft.ManagedIdentity/userAssignedIdentities@2022-01-31-preview' = { ... }`
//!
//! Text shaped like a reference inside a comment or string literal is
//! matched as well.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

use regex::{Captures, Regex};
use tracing::debug;

use crate::config::TEMPLATE_EXTENSION;
use crate::parser::traits::{ParseError, Parser};
use crate::parser::types::{ResourceReference, TemplateFile};

/// Parser for Bicep files
pub struct BicepParser {
    /// Regex for a reference: `Microsoft.Namespace/typeName@2021-01-01[-preview]`
    reference_re: Regex,
}

impl BicepParser {
    pub fn new() -> Self {
        Self {
            // The preview alternative comes first so the longest token wins
            reference_re: Regex::new(
                r"(?P<namespace>Microsoft\.[a-zA-Z]+)/(?P<type>[a-zA-Z]+)@(?P<version>[0-9]{4}-[0-9]{2}-[0-9]{2}-preview|[0-9]{4}-[0-9]{2}-[0-9]{2})",
            )
            .unwrap(),
        }
    }

    /// Check that the path exists, is not a directory and has the template extension
    pub async fn validate(&self, path: &Path) -> Result<(), ParseError> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| ParseError::from_io(path, e))?;

        if metadata.is_dir() {
            return Err(ParseError::IsDirectory(path.to_path_buf()));
        }

        if !self.can_parse(path) {
            return Err(ParseError::InvalidExtension(path.to_path_buf()));
        }

        Ok(())
    }

    /// Validate and read a file, returning its references
    pub async fn parse_file(&self, path: &Path) -> Result<TemplateFile, ParseError> {
        self.validate(path).await?;

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ParseError::from_io(path, e))?;

        let references = self.parse(&content);
        debug!("Found {} references in {:?}", references.len(), path);

        Ok(TemplateFile::new(path, references))
    }

    /// Replace the version of every reference token listed in `updates`.
    ///
    /// Keys are full tokens (`Microsoft.Web/sites@2019-08-01`), values the new
    /// version. Only whole tokens are replaced, so `...@2019-08-01` never
    /// touches `...@2019-08-01-preview`. Everything else is left as is.
    pub fn substitute_versions<'a>(
        &self,
        content: &'a str,
        updates: &HashMap<String, String>,
    ) -> Cow<'a, str> {
        if updates.is_empty() {
            return Cow::Borrowed(content);
        }

        self.reference_re
            .replace_all(content, |caps: &Captures| match updates.get(&caps[0]) {
                Some(version) => format!("{}/{}@{}", &caps["namespace"], &caps["type"], version),
                None => caps[0].to_string(),
            })
    }
}

impl Default for BicepParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for BicepParser {
    fn can_parse(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == TEMPLATE_EXTENSION)
    }

    fn parse(&self, content: &str) -> Vec<ResourceReference> {
        let mut results = Vec::new();
        let mut line = 0;
        let mut line_start = 0;
        let mut scanned = 0;

        for caps in self.reference_re.captures_iter(content) {
            let whole = caps.get(0).unwrap();

            // Advance line tracking up to the start of this match
            for (pos, _) in content[scanned..whole.start()].match_indices('\n') {
                line += 1;
                line_start = scanned + pos + 1;
            }
            scanned = whole.start();

            results.push(ResourceReference::new(
                &caps["namespace"],
                &caps["type"],
                &caps["version"],
                line,
                whole.start() - line_start,
            ));
        }

        results
    }
}
