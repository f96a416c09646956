use std::path::{Path, PathBuf};

use crate::error::HookError;

#[derive(Debug, Clone)]
pub struct RepoContext {
    /// Working tree root.
    pub root: PathBuf,
    pub git_dir: PathBuf,
    /// Directory git runs hooks from (`core.hooksPath` or `<git_dir>/hooks`).
    pub hooks_dir: PathBuf,
    pub core_hooks_path: Option<String>,
}

pub fn discover_repo_context(start: &Path) -> Result<RepoContext, HookError> {
    let repo = gix::discover(start).map_err(|_| HookError::NotGitRepo(start.to_path_buf()))?;
    let repo_root = repo
        .work_dir()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| start.to_path_buf());
    let git_dir = repo.git_dir().to_path_buf();

    let core_hooks_path = repo
        .config_snapshot()
        .string("core.hooksPath")
        .map(|v| v.to_string());

    let hooks_dir = match core_hooks_path.as_deref() {
        Some(path) if !path.trim().is_empty() => {
            let configured = PathBuf::from(path);
            if configured.is_absolute() {
                configured
            } else {
                repo_root.join(configured)
            }
        }
        _ => git_dir.join("hooks"),
    };

    Ok(RepoContext {
        root: repo_root,
        git_dir,
        hooks_dir,
        core_hooks_path,
    })
}
