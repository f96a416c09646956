use std::path::Path;

use crate::bootstrap;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::check::{self, Selection};
use crate::output::{banner, output_batch};

/// Check staged spreadsheets from inside `git commit`.
pub async fn run(project_root: &Path, flags: &GlobalFlags) -> anyhow::Result<bool> {
    let framed = flags.format == OutputFormat::Text && !flags.quiet;
    if framed {
        println!("{}", banner("sheetgate: checking staged spreadsheets"));
    }

    let config = bootstrap::load_config(project_root);
    let report = check::run(Selection::Staged, flags, project_root, &config).await;
    output_batch(&report, flags.format)?;

    let success = report.is_success();
    if framed {
        if success {
            println!("{}", banner("✓ spreadsheet check passed"));
        } else {
            println!(
                "{}",
                banner(
                    "✗ spreadsheet check failed, commit blocked\n\
                     fix the problems above and commit again"
                )
            );
        }
    } else if !success {
        eprintln!("commit blocked: spreadsheet check failed");
    }
    Ok(success)
}
