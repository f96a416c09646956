use std::path::{Path, PathBuf};

use anyhow::Context;
use sheetgate_config::SheetgateConfig;

use crate::cli::GlobalFlags;
use crate::ui;

/// The git work tree enclosing `--project` (or the current directory when
/// no flag is given). Outside a repository the directory itself is used.
pub fn resolve_project_root(flags: &GlobalFlags) -> anyhow::Result<PathBuf> {
    let start = match flags.project.as_deref() {
        Some(path) => {
            let explicit = PathBuf::from(path);
            if !explicit.is_dir() {
                anyhow::bail!(
                    "invalid --project '{}': directory does not exist",
                    explicit.display()
                );
            }
            std::path::absolute(&explicit)
                .with_context(|| format!("failed to resolve --project '{}'", explicit.display()))?
        }
        None => std::env::current_dir().context("failed to read current directory")?,
    };
    Ok(work_tree_root(start))
}

fn work_tree_root(start: PathBuf) -> PathBuf {
    match sheetgate_hooks::discover_repo_context(&start) {
        Ok(repo) => {
            tracing::debug!(root = %repo.root.display(), "project root from git work tree");
            repo.root
        }
        Err(error) => {
            tracing::debug!(%error, dir = %start.display(), "not inside a git work tree");
            start
        }
    }
}

/// Load configuration for `project_root`. A broken config file never
/// aborts the run: the fault is reported and the defaults are used.
pub fn load_config(project_root: &Path) -> SheetgateConfig {
    let (config, error) = SheetgateConfig::load_or_default(project_root);
    if let Some(error) = error {
        tracing::warn!(%error, "invalid configuration; falling back to defaults");
        ui::notice(&format!("warning: {error}; using default configuration"));
    }
    tracing::debug!(?config, "configuration loaded");
    config
}
