use std::path::Path;

use crate::cli::GlobalFlags;
use crate::output::output;

/// Fails (exit 1) when an unmanaged hook blocked installation.
pub fn run(
    project_root: &Path,
    strategy: sheetgate_hooks::HookInstallStrategy,
    flags: &GlobalFlags,
) -> anyhow::Result<bool> {
    let report = sheetgate_hooks::install_hooks(project_root, strategy)?;
    output(&report, flags.format)?;
    Ok(report.installed)
}
