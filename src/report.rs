//! Plain-text reports for scan and update runs

use std::io::{self, Write};
use std::path::Path;

use crate::parser::types::{ReferenceStatus, TemplateFile};
use crate::pipeline::directory::{Action, Outcome};

/// Write a report of `outcome` to `out`
///
/// Scans list every reference (only outdated or unresolved ones when
/// `outdated_only` is set); updates list the substitutions performed.
pub fn write_outcome<W: Write>(
    out: &mut W,
    outcome: &Outcome,
    action: Action,
    outdated_only: bool,
) -> io::Result<()> {
    match outcome {
        Outcome::File(file) => {
            write_file(out, file, &file.path.display().to_string(), action, outdated_only)
        }
        Outcome::Directory(directory) => {
            writeln!(out, "{}:", directory.root.display())?;
            writeln!(out)?;
            for file in &directory.files {
                let name = relative_name(&directory.root, &file.path);
                write_file(out, file, &name, action, outdated_only)?;
            }
            Ok(())
        }
    }
}

fn relative_name(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn write_file<W: Write>(
    out: &mut W,
    file: &TemplateFile,
    name: &str,
    action: Action,
    outdated_only: bool,
) -> io::Result<()> {
    writeln!(out, "{}:", name)?;

    match action {
        Action::Scan => {
            for reference in &file.references {
                match (reference.status(), reference.selected_version.as_deref()) {
                    (ReferenceStatus::Outdated, Some(selected)) => writeln!(
                        out,
                        "  - {} is using {} while the latest version is {}",
                        reference.type_id(),
                        reference.current_version,
                        selected
                    )?,
                    (ReferenceStatus::UpToDate, _) if !outdated_only => writeln!(
                        out,
                        "  - {} is using the latest version {}",
                        reference.type_id(),
                        reference.current_version
                    )?,
                    (ReferenceStatus::Unresolved, _) => writeln!(
                        out,
                        "  - {} could not be resolved (using {})",
                        reference.type_id(),
                        reference.current_version
                    )?,
                    _ => {}
                }
            }
        }
        Action::Update(_) => {
            let mut updated = 0;
            for reference in file.outdated() {
                if let Some(selected) = reference.selected_version.as_deref() {
                    writeln!(
                        out,
                        "  + Updated {} from {} to {}",
                        reference.type_id(),
                        reference.current_version,
                        selected
                    )?;
                    updated += 1;
                }
            }
            if updated == 0 {
                writeln!(out, "  No updates needed")?;
            }
        }
    }

    writeln!(out)
}
