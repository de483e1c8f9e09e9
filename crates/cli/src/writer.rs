//! Writes rendered files under the configuration context and formats them.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use console::style;
use dialoguer::Select;
use lts_core::RenderedFile;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Generated subdirectories cleared by [`DirAction::Overwrite`].
const GENERATED_DIRS: &[&str] = &["api", "interface"];

/// What to do with an output directory that already has content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirAction {
    /// Write generated files next to what is there, replacing same-named files.
    Merge,
    /// Clear the generated `api/` and `interface/` directories first.
    Overwrite,
    /// Leave the directory untouched.
    Skip,
}

/// Files written and directories skipped by [`write_files`].
#[derive(Debug, Default)]
pub struct WriteReport {
    /// Files written, relative to the context.
    pub written: Vec<PathBuf>,
    /// Output directories left untouched.
    pub skipped: Vec<String>,
}

fn is_non_empty_dir(dir: &Path) -> bool {
    fs::read_dir(dir).is_ok_and(|mut entries| entries.next().is_some())
}

/// Ask how to treat a non-empty output directory.
pub fn prompt_action(dir: &Path) -> Result<DirAction, String> {
    let selection = Select::new()
        .with_prompt(format!(
            "Output directory {} is not empty. Pick an action",
            style(dir.display()).cyan()
        ))
        .items(&["Merge", "Overwrite", "Skip"])
        .default(0)
        .interact()
        .map_err(|err| format!("Failed to read directory action: {err}"))?;
    Ok(match selection {
        0 => DirAction::Merge,
        1 => DirAction::Overwrite,
        _ => DirAction::Skip,
    })
}

/// Decide an action per output directory of `files`. Empty or missing directories are
/// merged into; `assume_merge` answers every question with [`DirAction::Merge`].
pub fn resolve_actions<F>(
    context: &Path,
    files: &[RenderedFile],
    assume_merge: bool,
    mut ask: F,
) -> Result<BTreeMap<String, DirAction>, String>
where
    F: FnMut(&Path) -> Result<DirAction, String>,
{
    let mut actions = BTreeMap::new();
    for file in files {
        if actions.contains_key(&file.output) {
            continue;
        }
        let dir = context.join(&file.output);
        let action = if assume_merge || !is_non_empty_dir(&dir) {
            DirAction::Merge
        } else {
            ask(&dir)?
        };
        debug!(dir = %dir.display(), ?action, "Resolved output directory action");
        actions.insert(file.output.clone(), action);
    }
    Ok(actions)
}

/// Write every file whose directory is not skipped.
pub fn write_files(
    context: &Path,
    files: &[RenderedFile],
    actions: &BTreeMap<String, DirAction>,
) -> Result<WriteReport, String> {
    let mut report = WriteReport::default();

    for (output, action) in actions {
        match action {
            DirAction::Skip => {
                info!(output = %output, "Skipping output directory");
                report.skipped.push(output.clone());
            }
            DirAction::Overwrite => {
                for name in GENERATED_DIRS {
                    let dir = context.join(output).join(name);
                    if dir.is_dir() {
                        fs::remove_dir_all(&dir)
                            .map_err(|err| format!("Failed to clear {}: {err}", dir.display()))?;
                        debug!(dir = %dir.display(), "Cleared generated directory");
                    }
                }
            }
            DirAction::Merge => {}
        }
    }

    for file in files {
        let action = actions.get(&file.output).copied().unwrap_or(DirAction::Merge);
        if action == DirAction::Skip {
            continue;
        }
        let path = context.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| format!("Failed to create {}: {err}", parent.display()))?;
        }
        fs::write(&path, &file.contents)
            .map_err(|err| format!("Failed to write {}: {err}", path.display()))?;
        debug!(path = %path.display(), "Wrote file");
        report.written.push(path);
    }

    Ok(report)
}

/// Run `prettier --write` over the written files when it is installed.
pub async fn format_files(paths: &[PathBuf]) {
    if paths.is_empty() {
        return;
    }
    let prettier = match which::which("prettier") {
        Ok(path) => path,
        Err(err) => {
            debug!(error = %err, "prettier not found, leaving files unformatted");
            return;
        }
    };

    match Command::new(&prettier)
        .arg("--write")
        .args(paths)
        .output()
        .await
    {
        Ok(output) if output.status.success() => {
            debug!(files = paths.len(), "Formatted generated files");
        }
        Ok(output) => {
            warn!(
                status = ?output.status.code(),
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "prettier failed, files are left unformatted"
            );
        }
        Err(err) => {
            warn!(prettier = %prettier.display(), error = %err, "Failed to run prettier");
        }
    }
}
