//! Rewriting of template files with their selected versions

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::UPDATED_SUFFIX;
use crate::parser::bicep::BicepParser;
use crate::parser::types::{ResourceReference, TemplateFile};
use crate::pipeline::error::PipelineError;

/// Where rewritten content goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Overwrite the source file
    InPlace,
    /// Write `<stem>_updated.<ext>` next to the source file
    SideBySide,
}

/// Path used by [`WriteMode::SideBySide`]: `main.bicep` -> `main_updated.bicep`
pub fn updated_path(path: &Path) -> PathBuf {
    let mut name = path.file_stem().unwrap_or_default().to_os_string();
    name.push(UPDATED_SUFFIX);
    if let Some(extension) = path.extension() {
        name.push(".");
        name.push(extension);
    }
    path.with_file_name(name)
}

/// Map of full token (`ns/type@current`) to the version it moves to
fn pending_updates(references: &[ResourceReference]) -> HashMap<String, String> {
    references
        .iter()
        .filter_map(|r| r.pending_update().map(|selected| (r.token(), selected.to_string())))
        .collect()
}

fn rewrite_error(path: &Path) -> impl FnOnce(std::io::Error) -> PipelineError + use<> {
    let path = path.to_path_buf();
    move |source| PipelineError::Rewrite { path, source }
}

/// Apply the selected versions of `references` to `content`
pub fn apply_updates(
    parser: &BicepParser,
    content: &str,
    references: &[ResourceReference],
) -> String {
    parser
        .substitute_versions(content, &pending_updates(references))
        .into_owned()
}

/// Rewrite a file so each reference points at its selected version
///
/// The file is read again, every outdated token is substituted in memory and
/// the result is written once, carrying over the source's permissions.
/// In place, `file` then reflects the new content (pinned versions equal the
/// selected ones). Side by side, `file` is left untouched.
///
/// Returns the path written to.
pub async fn rewrite_file(
    parser: &BicepParser,
    file: &mut TemplateFile,
    mode: WriteMode,
) -> Result<PathBuf, PipelineError> {
    let metadata = tokio::fs::metadata(&file.path)
        .await
        .map_err(rewrite_error(&file.path))?;
    let content = tokio::fs::read_to_string(&file.path)
        .await
        .map_err(rewrite_error(&file.path))?;

    let updated = apply_updates(parser, &content, &file.references);

    let target = match mode {
        WriteMode::InPlace => file.path.clone(),
        WriteMode::SideBySide => updated_path(&file.path),
    };

    tokio::fs::write(&target, updated.as_bytes())
        .await
        .map_err(rewrite_error(&target))?;
    tokio::fs::set_permissions(&target, metadata.permissions())
        .await
        .map_err(rewrite_error(&target))?;

    for reference in file.references.iter() {
        if let Some(selected) = reference.pending_update() {
            info!(
                "Updated {} from {} to {} in {:?}",
                reference.type_id(),
                reference.current_version,
                selected,
                target
            );
        }
    }

    if mode == WriteMode::InPlace {
        for reference in file.references.iter_mut() {
            if let Some(selected) = reference.selected_version.clone() {
                reference.current_version = selected;
            }
        }
    }

    Ok(target)
}
