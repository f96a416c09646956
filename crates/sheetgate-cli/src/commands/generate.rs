use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use sheetgate_workbook::{SampleOptions, generate_samples};

use crate::bootstrap;
use crate::cli::{GenerateArgs, GlobalFlags};
use crate::output::output;

#[derive(Debug, Serialize)]
struct GenerateResponse {
    dir: String,
    count: usize,
    sheet_name: String,
    first: Option<String>,
    last: Option<String>,
}

/// Handle `sheetgate generate`.
pub async fn handle(
    args: &GenerateArgs,
    flags: &GlobalFlags,
    project_root: &Path,
) -> anyhow::Result<()> {
    let config = bootstrap::load_config(project_root);
    let dir = args
        .dir
        .clone()
        .unwrap_or_else(|| config.excel_dir_path(project_root));
    let options = SampleOptions {
        count: args.count,
        data_sheets: args.sheets,
        sheet_name: config.sheet_name,
    };
    let sheet_name = options.sheet_name.clone();

    let target = dir.clone();
    let paths: Vec<PathBuf> =
        tokio::task::spawn_blocking(move || generate_samples(&target, &options))
            .await
            .context("sample generation task failed")?
            .with_context(|| format!("failed to write sample workbooks to {}", dir.display()))?;

    let name = |path: Option<&PathBuf>| path.map(|p| p.display().to_string());
    output(
        &GenerateResponse {
            dir: dir.display().to_string(),
            count: paths.len(),
            sheet_name,
            first: name(paths.first()),
            last: name(paths.last()),
        },
        flags.format,
    )
}
