use std::fmt::Write as _;

use serde::Serialize;
use serde_json::Value;
use sheetgate_check::BatchReport;
use sheetgate_core::{CheckResult, CheckStatus};

use crate::cli::OutputFormat;

const SEPARATOR_WIDTH: usize = 60;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Text => render_text(value),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// Print a batch report; text mode gets the per-file listing and summary.
pub fn output_batch(report: &BatchReport, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            print!("{}", render_batch_text(report));
            Ok(())
        }
        OutputFormat::Json | OutputFormat::Raw => output(report, format),
    }
}

#[must_use]
pub fn separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}

#[must_use]
pub fn banner(message: &str) -> String {
    let rule = "=".repeat(SEPARATOR_WIDTH);
    format!("{rule}\n{message}\n{rule}")
}

#[must_use]
pub fn render_batch_text(report: &BatchReport) -> String {
    let mut out = String::new();
    if report.nothing_to_check {
        out.push_str("no spreadsheets to check\n");
        return out;
    }

    for result in &report.results {
        render_result(&mut out, result);
    }

    let _ = writeln!(out, "{}", separator());
    if let Some(warning) = &report.cache_warning {
        let _ = writeln!(out, "warning: cache not saved: {warning}");
    }
    let summary = &report.summary;
    let _ = writeln!(
        out,
        "check finished: {} passed, {} skipped, {} failed ({} warnings)",
        summary.passed, summary.skipped, summary.failed, summary.warnings
    );
    out
}

fn render_result(out: &mut String, result: &CheckResult) {
    let name = &result.display_name;
    let _ = match result.status {
        CheckStatus::Pass => writeln!(out, "✓ {name} - passed"),
        CheckStatus::Skipped => writeln!(out, "- {name} - unchanged, skipped"),
        CheckStatus::Error => writeln!(out, "✗ {name} - failed"),
    };
    for error in &result.errors {
        let _ = writeln!(out, "  error: {error}");
    }
    for warning in &result.warnings {
        let _ = writeln!(out, "  warning: {warning}");
    }
}

fn render_text<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let value = serde_json::to_value(value)?;
    match value {
        Value::Object(map) => {
            let width = map.keys().map(String::len).max().unwrap_or(0);
            let lines = map
                .iter()
                .map(|(key, value)| format!("{key:<width$}  {}", value_to_cell(value)))
                .collect::<Vec<_>>();
            Ok(lines.join("\n"))
        }
        Value::Array(items) => Ok(items
            .iter()
            .map(value_to_cell)
            .collect::<Vec<_>>()
            .join("\n")),
        scalar => Ok(value_to_cell(&scalar)),
    }
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        Value::Array(items) if items.iter().all(Value::is_string) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join("; "),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}
