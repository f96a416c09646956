//! # sheetgate-hooks
//!
//! Git integration for sheetgate:
//! - Staged-file queries and remote blob retrieval through the `git` CLI
//! - Repository discovery and config reading through `gix`
//! - Pre-commit hook installation, removal and status
//!
//! Every `git` invocation is bounded by a timeout so a hung process cannot
//! stall a commit.

pub mod error;
pub mod git;
pub mod installer;
pub mod repo;

#[cfg(test)]
mod test_support;

pub use error::HookError;
pub use git::{GitCli, VersionControl};
pub use installer::{
    HOOK_NAME, HookInstallMode, HookInstallStrategy, HookInstallationReport, HookKind,
    HookRemovalReport, HookStatusReport, install_hooks, status_hooks, uninstall_hooks,
};
pub use repo::{RepoContext, discover_repo_context};
