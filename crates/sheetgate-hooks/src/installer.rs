use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::HookError;
use crate::repo::{RepoContext, discover_repo_context};

pub const HOOK_NAME: &str = "pre-commit";
const MANAGED_MARKER: &str = "# sheetgate managed hook";
const CHAIN_MARKER: &str = "# sheetgate managed hook (chain)";
const HOOK_COMMAND: &str = "sheetgate hook pre-commit";

/// What to do when a pre-commit hook not managed by sheetgate already exists.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HookInstallStrategy {
    /// Move the existing hook to `pre-commit.user` and run it before sheetgate.
    Chain,
    /// Copy the existing hook to `pre-commit.backup` and replace it.
    Backup,
    /// Leave the existing hook alone.
    Refuse,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HookInstallMode {
    Fresh,
    Chain,
    Replaced,
    Unchanged,
    None,
}

#[derive(Debug, Serialize)]
pub struct HookInstallationReport {
    pub installed: bool,
    pub mode: HookInstallMode,
    pub hook_path: String,
    pub backup_path: Option<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HookRemovalReport {
    pub removed: bool,
    pub restored_user_hook: bool,
    pub hook_path: String,
    pub warnings: Vec<String>,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HookKind {
    Managed,
    Chain,
    Foreign,
    Missing,
}

#[derive(Debug, Serialize)]
pub struct HookStatusReport {
    pub root: String,
    pub hooks_dir: String,
    pub core_hooks_path: Option<String>,
    pub hook: String,
    pub kind: HookKind,
    pub executable: bool,
    pub wired: bool,
    pub message: Option<String>,
    pub next_steps: Vec<String>,
}

pub fn install_hooks(
    project_root: &Path,
    strategy: HookInstallStrategy,
) -> Result<HookInstallationReport, HookError> {
    let repo = discover_repo_context(project_root)?;
    fs::create_dir_all(&repo.hooks_dir)?;

    let mut warnings = Vec::new();
    if let Some(path) = &repo.core_hooks_path {
        warnings.push(format!("core.hooksPath is set to '{path}'"));
    }

    let target = repo.hooks_dir.join(HOOK_NAME);
    let (mode, backup) = install_single_hook(&target, strategy)?;
    if mode == HookInstallMode::None {
        warnings.push(format!(
            "existing {HOOK_NAME} hook is not managed by sheetgate; rerun with --strategy chain or backup"
        ));
    } else {
        info!(hook = %target.display(), ?mode, "pre-commit hook installed");
    }

    Ok(HookInstallationReport {
        installed: mode != HookInstallMode::None,
        mode,
        hook_path: display(&target),
        backup_path: backup.as_deref().map(display),
        warnings,
    })
}

pub fn uninstall_hooks(project_root: &Path) -> Result<HookRemovalReport, HookError> {
    let repo = discover_repo_context(project_root)?;
    let target = repo.hooks_dir.join(HOOK_NAME);
    let user_hook = user_hook_path(&target);

    let mut report = HookRemovalReport {
        removed: false,
        restored_user_hook: false,
        hook_path: display(&target),
        warnings: Vec::new(),
    };

    match hook_kind(&target) {
        HookKind::Missing => {}
        HookKind::Foreign => report
            .warnings
            .push(format!("{HOOK_NAME} hook is not managed by sheetgate; left in place")),
        HookKind::Managed | HookKind::Chain => {
            fs::remove_file(&target)?;
            report.removed = true;
            if user_hook.exists() {
                fs::rename(&user_hook, &target)?;
                report.restored_user_hook = true;
            }
        }
    }

    Ok(report)
}

pub fn status_hooks(project_root: &Path) -> Result<HookStatusReport, HookError> {
    let repo = discover_repo_context(project_root)?;
    let target = repo.hooks_dir.join(HOOK_NAME);
    let kind = hook_kind(&target);
    let executable = is_executable(&target)?;
    let wired = matches!(kind, HookKind::Managed | HookKind::Chain) && executable;

    let message = match kind {
        HookKind::Missing => Some("hook file not installed in git hooks directory".to_string()),
        HookKind::Foreign => Some("existing hook is not managed by sheetgate".to_string()),
        HookKind::Managed | HookKind::Chain if !executable => {
            Some("hook file is not executable".to_string())
        }
        HookKind::Managed | HookKind::Chain => None,
    };

    let mut next_steps = Vec::new();
    if !wired {
        next_steps.push("run: sheetgate hook install --strategy chain".to_string());
    }

    Ok(status_report(&repo, kind, executable, wired, message, next_steps))
}

fn status_report(
    repo: &RepoContext,
    kind: HookKind,
    executable: bool,
    wired: bool,
    message: Option<String>,
    next_steps: Vec<String>,
) -> HookStatusReport {
    HookStatusReport {
        root: display(&repo.root),
        hooks_dir: display(&repo.hooks_dir),
        core_hooks_path: repo.core_hooks_path.clone(),
        hook: HOOK_NAME.to_string(),
        kind,
        executable,
        wired,
        message,
        next_steps,
    }
}

fn install_single_hook(
    target: &Path,
    strategy: HookInstallStrategy,
) -> Result<(HookInstallMode, Option<PathBuf>), HookError> {
    match hook_kind(target) {
        HookKind::Missing => {
            write_hook(target, &managed_script())?;
            Ok((HookInstallMode::Fresh, None))
        }
        HookKind::Managed | HookKind::Chain => {
            make_executable(target)?;
            Ok((HookInstallMode::Unchanged, None))
        }
        HookKind::Foreign => match strategy {
            HookInstallStrategy::Refuse => Ok((HookInstallMode::None, None)),
            HookInstallStrategy::Chain => {
                let user_hook = user_hook_path(target);
                if user_hook.exists() {
                    return Err(HookError::HookConflict {
                        path: user_hook,
                        reason: "a chained user hook already exists".to_string(),
                    });
                }
                fs::rename(target, &user_hook)?;
                write_hook(target, &chain_script())?;
                Ok((HookInstallMode::Chain, Some(user_hook)))
            }
            HookInstallStrategy::Backup => {
                let backup = sibling(target, &format!("{HOOK_NAME}.backup"));
                if backup.exists() {
                    return Err(HookError::HookConflict {
                        path: backup,
                        reason: "a hook backup already exists".to_string(),
                    });
                }
                fs::copy(target, &backup)?;
                write_hook(target, &managed_script())?;
                Ok((HookInstallMode::Replaced, Some(backup)))
            }
        },
    }
}

fn managed_script() -> String {
    format!("#!/bin/sh\n{MANAGED_MARKER}\nexec {HOOK_COMMAND} \"$@\"\n")
}

fn chain_script() -> String {
    format!(
        "#!/bin/sh\n{CHAIN_MARKER}\nif [ -x \"$(dirname \"$0\")/{HOOK_NAME}.user\" ]; then\n    \"$(dirname \"$0\")/{HOOK_NAME}.user\" \"$@\" || exit $?\nfi\nexec {HOOK_COMMAND} \"$@\"\n"
    )
}

fn write_hook(target: &Path, content: &str) -> Result<(), HookError> {
    fs::write(target, content)?;
    make_executable(target)
}

fn make_executable(target: &Path) -> Result<(), HookError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(target)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(target, perms)?;
    }
    #[cfg(not(unix))]
    let _ = target;
    Ok(())
}

fn hook_kind(target: &Path) -> HookKind {
    if !target.exists() {
        return HookKind::Missing;
    }
    let content = fs::read_to_string(target).unwrap_or_default();
    if content.contains(CHAIN_MARKER) {
        HookKind::Chain
    } else if content.contains(MANAGED_MARKER) {
        HookKind::Managed
    } else {
        HookKind::Foreign
    }
}

fn is_executable(path: &Path) -> Result<bool, HookError> {
    if !path.exists() {
        return Ok(false);
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(path)?.permissions().mode();
        Ok(mode & 0o111 != 0)
    }
    #[cfg(not(unix))]
    {
        Ok(true)
    }
}

fn user_hook_path(target: &Path) -> PathBuf {
    sibling(target, &format!("{HOOK_NAME}.user"))
}

fn sibling(target: &Path, name: &str) -> PathBuf {
    target.parent().unwrap_or_else(|| Path::new(".")).join(name)
}

fn display(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::{init_temp_repo, run_git};

    fn hook_path(root: &Path) -> PathBuf {
        root.join(".git").join("hooks").join(HOOK_NAME)
    }

    #[test]
    fn fresh_install_writes_executable_managed_hook() {
        let (_dir, root) = init_temp_repo();

        let report = install_hooks(&root, HookInstallStrategy::Refuse).expect("install");
        assert!(report.installed);
        assert_eq!(report.mode, HookInstallMode::Fresh);

        let content = fs::read_to_string(hook_path(&root)).expect("hook written");
        assert!(content.contains("sheetgate hook pre-commit"));
        assert!(is_executable(&hook_path(&root)).expect("metadata"));
    }

    #[test]
    fn reinstall_is_unchanged() {
        let (_dir, root) = init_temp_repo();
        install_hooks(&root, HookInstallStrategy::Refuse).expect("first install");

        let report = install_hooks(&root, HookInstallStrategy::Refuse).expect("second install");
        assert_eq!(report.mode, HookInstallMode::Unchanged);
        assert!(report.installed);
    }

    #[test]
    fn refuse_leaves_foreign_hook() {
        let (_dir, root) = init_temp_repo();
        fs::create_dir_all(hook_path(&root).parent().unwrap()).unwrap();
        fs::write(hook_path(&root), "#!/bin/sh\necho custom\n").unwrap();

        let report = install_hooks(&root, HookInstallStrategy::Refuse).expect("install");
        assert!(!report.installed);
        assert_eq!(report.mode, HookInstallMode::None);
        assert_eq!(
            fs::read_to_string(hook_path(&root)).unwrap(),
            "#!/bin/sh\necho custom\n"
        );
    }

    #[test]
    fn chain_moves_foreign_hook_aside_and_uninstall_restores_it() {
        let (_dir, root) = init_temp_repo();
        fs::create_dir_all(hook_path(&root).parent().unwrap()).unwrap();
        fs::write(hook_path(&root), "#!/bin/sh\necho custom\n").unwrap();

        let report = install_hooks(&root, HookInstallStrategy::Chain).expect("install");
        assert_eq!(report.mode, HookInstallMode::Chain);
        let user_hook = user_hook_path(&hook_path(&root));
        assert!(user_hook.exists());
        assert!(
            fs::read_to_string(hook_path(&root))
                .unwrap()
                .contains(CHAIN_MARKER)
        );

        let removal = uninstall_hooks(&root).expect("uninstall");
        assert!(removal.removed);
        assert!(removal.restored_user_hook);
        assert_eq!(
            fs::read_to_string(hook_path(&root)).unwrap(),
            "#!/bin/sh\necho custom\n"
        );
    }

    #[test]
    fn backup_copies_foreign_hook_and_replaces_it() {
        let (_dir, root) = init_temp_repo();
        fs::create_dir_all(hook_path(&root).parent().unwrap()).unwrap();
        fs::write(hook_path(&root), "#!/bin/sh\necho custom\n").unwrap();

        let report = install_hooks(&root, HookInstallStrategy::Backup).expect("install");
        assert_eq!(report.mode, HookInstallMode::Replaced);
        let backup = report.backup_path.expect("backup path");
        assert_eq!(
            fs::read_to_string(backup).unwrap(),
            "#!/bin/sh\necho custom\n"
        );
        assert_eq!(hook_kind(&hook_path(&root)), HookKind::Managed);
    }

    #[test]
    fn backup_refuses_to_overwrite_earlier_backup() {
        let (_dir, root) = init_temp_repo();
        let hooks = hook_path(&root).parent().unwrap().to_path_buf();
        fs::create_dir_all(&hooks).unwrap();
        fs::write(hooks.join("pre-commit.backup"), "#!/bin/sh\necho older\n").unwrap();
        fs::write(hook_path(&root), "#!/bin/sh\necho custom\n").unwrap();

        let error = install_hooks(&root, HookInstallStrategy::Backup).unwrap_err();
        assert!(matches!(error, HookError::HookConflict { .. }));
        assert_eq!(
            fs::read_to_string(hooks.join("pre-commit.backup")).unwrap(),
            "#!/bin/sh\necho older\n"
        );
        assert_eq!(
            fs::read_to_string(hook_path(&root)).unwrap(),
            "#!/bin/sh\necho custom\n"
        );
    }

    #[test]
    fn hand_written_hook_calling_sheetgate_is_foreign() {
        let (_dir, root) = init_temp_repo();
        let script = "#!/bin/sh\nnpm run lint || exit 1\nsheetgate hook pre-commit\n";
        fs::create_dir_all(hook_path(&root).parent().unwrap()).unwrap();
        fs::write(hook_path(&root), script).unwrap();

        assert_eq!(hook_kind(&hook_path(&root)), HookKind::Foreign);
        let removal = uninstall_hooks(&root).expect("uninstall");
        assert!(!removal.removed);
        assert_eq!(fs::read_to_string(hook_path(&root)).unwrap(), script);
    }

    #[test]
    fn uninstall_leaves_foreign_hook() {
        let (_dir, root) = init_temp_repo();
        fs::create_dir_all(hook_path(&root).parent().unwrap()).unwrap();
        fs::write(hook_path(&root), "#!/bin/sh\necho custom\n").unwrap();

        let removal = uninstall_hooks(&root).expect("uninstall");
        assert!(!removal.removed);
        assert_eq!(removal.warnings.len(), 1);
        assert!(hook_path(&root).exists());
    }

    #[test]
    fn status_reports_missing_then_wired() {
        let (_dir, root) = init_temp_repo();

        let before = status_hooks(&root).expect("status");
        assert_eq!(before.kind, HookKind::Missing);
        assert!(!before.wired);
        assert_eq!(before.next_steps.len(), 1);

        install_hooks(&root, HookInstallStrategy::Chain).expect("install");
        let after = status_hooks(&root).expect("status");
        assert_eq!(after.kind, HookKind::Managed);
        assert!(after.wired);
        assert!(after.next_steps.is_empty());
    }

    #[test]
    fn core_hooks_path_is_honored() {
        let (_dir, root) = init_temp_repo();
        run_git(&root, &["config", "core.hooksPath", ".githooks"]);

        let report = install_hooks(&root, HookInstallStrategy::Refuse).expect("install");
        assert!(root.join(".githooks").join(HOOK_NAME).exists());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn install_outside_repo_fails() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let error = install_hooks(dir.path(), HookInstallStrategy::Refuse)
            .expect_err("not a repo");
        assert!(matches!(error, HookError::NotGitRepo(_)));
    }
}
