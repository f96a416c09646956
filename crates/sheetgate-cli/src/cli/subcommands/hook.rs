use clap::{Subcommand, ValueEnum};

/// Hook lifecycle and the entrypoint called by the installed git hook.
#[derive(Clone, Debug, Subcommand)]
pub enum HookCommands {
    /// Install the managed pre-commit hook.
    Install {
        /// What to do with an existing pre-commit hook sheetgate does not manage.
        #[arg(long, value_enum, default_value = "refuse")]
        strategy: HookInstallStrategyArg,
    },
    /// Report whether the hook is installed and executable.
    Status,
    /// Remove the managed hook, restoring a chained user hook.
    Uninstall,
    /// Check staged spreadsheets; exits non-zero to block the commit.
    #[command(name = "pre-commit")]
    PreCommit,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum HookInstallStrategyArg {
    Chain,
    Backup,
    Refuse,
}
