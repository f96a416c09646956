use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::subcommands::HookCommands;

/// Top-level command tree. Without a subcommand, `sheetgate` checks
/// spreadsheets according to [`CheckArgs`].
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Manage and run the git pre-commit hook.
    Hook {
        #[command(subcommand)]
        action: HookCommands,
    },
    /// Write sample workbooks with revision logs.
    Generate(GenerateArgs),
}

/// Which spreadsheets to check. Default: the ones staged for commit.
#[derive(Clone, Debug, Default, Args)]
pub struct CheckArgs {
    /// Check every spreadsheet in the configured directory.
    #[arg(long, conflicts_with = "files")]
    pub all: bool,

    /// Check these files.
    #[arg(long, num_args = 1.., value_name = "PATH")]
    pub files: Vec<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct GenerateArgs {
    /// Number of workbooks to write.
    #[arg(long, default_value_t = 100)]
    pub count: usize,

    /// Output directory (defaults to the configured spreadsheet directory).
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Data sheets per workbook.
    #[arg(long, default_value_t = 3)]
    pub sheets: usize,
}
