//! Check results, batch summaries and cache entries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::CheckIssue;

// ---------------------------------------------------------------------------
// CheckStatus
// ---------------------------------------------------------------------------

/// Terminal status of one file in one batch run.
///
/// ```text
/// pass     → revision log present, basis verified or verification skipped with a warning
/// skipped  → content hash unchanged since the last successful check
/// error    → at least one blocking issue
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Skipped,
    Error,
}

impl CheckStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Skipped => "skipped",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CheckResult
// ---------------------------------------------------------------------------

/// Outcome of checking one candidate file. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub path: String,
    pub display_name: String,
    pub status: CheckStatus,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl CheckResult {
    /// A passing result with no messages.
    #[must_use]
    pub fn pass(path: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            display_name: display_name.into(),
            status: CheckStatus::Pass,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    #[must_use]
    pub fn skipped(path: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Skipped,
            ..Self::pass(path, display_name)
        }
    }

    /// Record an issue: blocking issues become errors and flip the status,
    /// the rest become warnings.
    pub fn push_issue(&mut self, issue: &CheckIssue) {
        if issue.is_blocking() {
            self.errors.push(issue.to_string());
            self.status = CheckStatus::Error;
        } else {
            self.warnings.push(issue.to_string());
        }
    }

    #[must_use]
    pub fn with_issue(mut self, issue: &CheckIssue) -> Self {
        self.push_issue(issue);
        self
    }
}

// ---------------------------------------------------------------------------
// BatchSummary
// ---------------------------------------------------------------------------

/// Counts over one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub passed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub warnings: usize,
}

impl BatchSummary {
    #[must_use]
    pub fn from_results(results: &[CheckResult]) -> Self {
        results.iter().fold(Self::default(), |mut summary, result| {
            summary.total += 1;
            summary.warnings += result.warnings.len();
            match result.status {
                CheckStatus::Pass => summary.passed += 1,
                CheckStatus::Skipped => summary.skipped += 1,
                CheckStatus::Error => summary.failed += 1,
            }
            summary
        })
    }

    /// Warnings never affect the verdict.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed == 0
    }
}

// ---------------------------------------------------------------------------
// CacheEntry
// ---------------------------------------------------------------------------

/// Last successful check of one path, as persisted in the cache file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub hash: String,
    pub last_check: String,
    pub record_count: usize,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn warnings_keep_pass_status() {
        let result = CheckResult::pass("excels/a.xlsx", "a.xlsx")
            .with_issue(&CheckIssue::RemoteUnavailable("not found".into()));
        assert_eq!(result.status, CheckStatus::Pass);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn blocking_issue_marks_error() {
        let result = CheckResult::pass("a.xlsx", "a.xlsx")
            .with_issue(&CheckIssue::StaleBasis("missing B".into()));
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn summary_counts_each_status() {
        let results = vec![
            CheckResult::pass("a", "a"),
            CheckResult::skipped("b", "b"),
            CheckResult::pass("c", "c").with_issue(&CheckIssue::LogRead("bad zip".into())),
            CheckResult::pass("d", "d").with_issue(&CheckIssue::RemoteUnavailable("x".into())),
        ];
        let summary = BatchSummary::from_results(&results);
        assert_eq!(
            summary,
            BatchSummary {
                total: 4,
                passed: 2,
                skipped: 1,
                failed: 1,
                warnings: 1,
            }
        );
        assert!(!summary.is_success());
    }

    #[test]
    fn empty_summary_is_success() {
        assert!(BatchSummary::from_results(&[]).is_success());
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&CheckStatus::Skipped).expect("serialize");
        assert_eq!(json, "\"skipped\"");
    }
}
