use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use sheetgate_check::{
    BatchReport, BatchRunner, CandidateSelection, FileChecker, HashCache, explicit_files,
    scan_directory, staged_files,
};
use sheetgate_config::SheetgateConfig;
use sheetgate_hooks::GitCli;
use sheetgate_workbook::RevisionLogReader;

use crate::cli::{CheckArgs, GlobalFlags, OutputFormat};
use crate::output::{output_batch, separator};
use crate::progress::CheckProgress;
use crate::ui;

/// Where candidates come from.
#[derive(Clone, Copy, Debug)]
pub enum Selection<'a> {
    Staged,
    All,
    /// Relative entries in `files` are resolved against `cwd`.
    Files { files: &'a [PathBuf], cwd: &'a Path },
}

impl<'a> Selection<'a> {
    #[must_use]
    pub fn from_args(args: &'a CheckArgs, cwd: &'a Path) -> Self {
        if !args.files.is_empty() {
            Self::Files {
                files: &args.files,
                cwd,
            }
        } else if args.all {
            Self::All
        } else {
            Self::Staged
        }
    }
}

/// Handle bare `sheetgate [--all | --files ...]`.
pub async fn handle(
    args: &CheckArgs,
    flags: &GlobalFlags,
    project_root: &Path,
    config: &SheetgateConfig,
) -> anyhow::Result<bool> {
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let report = run(Selection::from_args(args, &cwd), flags, project_root, config).await;
    output_batch(&report, flags.format)?;
    Ok(report.is_success())
}

/// Select candidates and check them. Per-file faults live in the report.
pub async fn run(
    selection: Selection<'_>,
    flags: &GlobalFlags,
    project_root: &Path,
    config: &SheetgateConfig,
) -> BatchReport {
    let git = GitCli::new(project_root, config.remote_ref.clone(), config.timeout());
    let excel_dir = config.excel_dir_path(project_root);
    let extension = config.normalized_extension();

    let CandidateSelection {
        candidates,
        notices,
    } = match selection {
        Selection::Staged => staged_files(&git, project_root, &excel_dir, &extension).await,
        Selection::All => CandidateSelection {
            candidates: scan_directory(project_root, &excel_dir, &extension),
            notices: Vec::new(),
        },
        Selection::Files { files, cwd } => explicit_files(project_root, cwd, files),
    };
    for notice in &notices {
        ui::notice(&format!("warning: {notice}"));
    }

    let (mut cache, cache_error) = HashCache::load_or_empty(config.cache_path(project_root));
    if let Some(error) = cache_error {
        tracing::warn!(%error, "cache unreadable; starting empty");
        ui::notice(&format!("warning: {error}; starting with an empty cache"));
    }

    if flags.format == OutputFormat::Text && !flags.quiet && !candidates.is_empty() {
        println!(
            "checking {} spreadsheet(s) with {} worker(s)",
            candidates.len(),
            config.max_threads
        );
        println!("{}", separator());
    }

    let checker = Arc::new(FileChecker::new(
        git,
        RevisionLogReader::new(config.sheet_name.clone()),
    ));
    let progress = CheckProgress::new();
    BatchRunner::new(&mut cache, checker, config.max_threads)
        .run(candidates, &progress)
        .await
}
