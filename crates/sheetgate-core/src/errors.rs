//! Per-file issue taxonomy.
//!
//! Every fault found while checking one file becomes a `CheckIssue`. Blocking
//! issues land in the file's error list and fail the batch; the rest are
//! warnings and never change the verdict. Crate-specific errors
//! (`WorkbookError`, `HookError`, ...) are mapped into these variants at the
//! file-checker boundary.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckIssue {
    /// The workbook has no sheet with the configured revision-log name.
    #[error("workbook has no '{sheet}' sheet")]
    SheetNotFound { sheet: String },

    /// The local workbook could not be hashed, opened or parsed.
    #[error("failed to read revision log: {0}")]
    LogRead(String),

    /// The revision-log sheet exists but holds no data rows.
    #[error("'{sheet}' sheet is empty, add a revision record before committing")]
    EmptyLocalLog { sheet: String },

    /// The remote blob could not be fetched (new file, timeout, git failure).
    #[error("remote version unavailable, basis check skipped: {0}")]
    RemoteUnavailable(String),

    /// The remote blob was fetched but its revision log could not be read.
    #[error("remote revision log unreadable, basis check skipped: {0}")]
    RemoteLogUnreadable(String),

    /// The local edit is not based on the remote's latest revision.
    #[error("not based on the latest remote version: {0}")]
    StaleBasis(String),

    /// The remote cannot serve as a basis.
    #[error("cannot verify basis: {0}")]
    IncomparableRemote(String),

    /// Anything not anticipated above, caught at the per-file boundary.
    #[error("unexpected fault while checking: {0}")]
    UnexpectedFault(String),
}

impl CheckIssue {
    /// Whether this issue blocks the commit.
    #[must_use]
    pub const fn is_blocking(&self) -> bool {
        !matches!(self, Self::RemoteUnavailable(_) | Self::RemoteLogUnreadable(_))
    }
}
