//! # sheetgate-core
//!
//! Core types shared across all sheetgate crates:
//! - Revision records and revision logs read from a workbook's revision sheet
//! - The basis comparator deciding whether a local edit includes the remote's latest revision
//! - Per-file check results, batch summaries, and cache entries
//! - The per-file issue taxonomy (`CheckIssue`)

pub mod basis;
pub mod check;
pub mod errors;
pub mod revision;

pub use basis::{BasisOutcome, compare};
pub use check::{BatchSummary, CacheEntry, CheckResult, CheckStatus};
pub use errors::CheckIssue;
pub use revision::{RevisionLog, RevisionRecord};
