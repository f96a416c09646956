#[path = "hook/install.rs"]
mod install;
#[path = "hook/pre_commit.rs"]
mod pre_commit;
#[path = "hook/status.rs"]
mod status;
#[path = "hook/uninstall.rs"]
mod uninstall;

use std::path::Path;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{HookCommands, HookInstallStrategyArg};

/// Handle `sheetgate hook`.
pub async fn handle(
    action: &HookCommands,
    flags: &GlobalFlags,
    project_root: &Path,
) -> anyhow::Result<bool> {
    match action {
        HookCommands::Install { strategy } => {
            let strategy = match strategy {
                HookInstallStrategyArg::Chain => sheetgate_hooks::HookInstallStrategy::Chain,
                HookInstallStrategyArg::Backup => sheetgate_hooks::HookInstallStrategy::Backup,
                HookInstallStrategyArg::Refuse => sheetgate_hooks::HookInstallStrategy::Refuse,
            };
            install::run(project_root, strategy, flags)
        }
        HookCommands::Status => status::run(project_root, flags),
        HookCommands::Uninstall => uninstall::run(project_root, flags),
        HookCommands::PreCommit => pre_commit::run(project_root, flags).await,
    }
}
