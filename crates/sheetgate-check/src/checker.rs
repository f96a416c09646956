//! Per-file check.
//!
//! ```text
//! hash ─┬─ unchanged ──────────────────────────────► skipped
//!       └─ changed ─► local log ─┬─ unreadable/empty ► error
//!                                └─ ok ─► remote blob ─┬─ unavailable ─► pass + warning
//!                                                      └─ ok ─► remote log ─┬─ unreadable ─► pass + warning
//!                                                                           └─ ok ─► compare ─┬─ up to date ─► pass
//!                                                                                             └─ stale/incomparable ─► error
//! ```
//!
//! A passing file yields a cache update; the checker itself never touches
//! the cache.

use std::path::PathBuf;

use serde::Serialize;
use sheetgate_core::{BasisOutcome, CheckIssue, CheckResult, RevisionLog, compare};
use sheetgate_hooks::VersionControl;
use sheetgate_workbook::{RevisionLogReader, WorkbookError, WorkbookSource};
use tracing::{debug, warn};

use crate::cache::content_hash;
use crate::candidates::Candidate;

/// New cache entry for a file that passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheUpdate {
    pub repo_path: String,
    pub hash: String,
    pub record_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub result: CheckResult,
    pub cache_update: Option<CacheUpdate>,
}

impl FileReport {
    fn finished(result: CheckResult) -> Self {
        Self {
            result,
            cache_update: None,
        }
    }
}

/// Outcome of the local stage, computed off the async runtime.
enum LocalStage {
    Unchanged,
    Read { hash: String, log: RevisionLog },
}

pub struct FileChecker<V> {
    vcs: V,
    reader: RevisionLogReader,
}

impl<V: VersionControl> FileChecker<V> {
    pub fn new(vcs: V, reader: RevisionLogReader) -> Self {
        Self { vcs, reader }
    }

    pub const fn vcs(&self) -> &V {
        &self.vcs
    }

    /// Check one candidate against the hash it had at its last successful
    /// check, if any.
    pub async fn check(&self, candidate: &Candidate, cached_hash: Option<String>) -> FileReport {
        let mut result = CheckResult::pass(&candidate.repo_path, &candidate.display_name);

        let (hash, local) = match self.local_stage(candidate.path.clone(), cached_hash).await {
            Ok(LocalStage::Unchanged) => {
                debug!(path = %candidate.repo_path, "unchanged since last check");
                return FileReport::finished(CheckResult::skipped(
                    &candidate.repo_path,
                    &candidate.display_name,
                ));
            }
            Ok(LocalStage::Read { hash, log }) => (hash, log),
            Err(issue) => return FileReport::finished(result.with_issue(&issue)),
        };

        if local.is_empty() {
            let issue = CheckIssue::EmptyLocalLog {
                sheet: self.reader.sheet_name().to_string(),
            };
            return FileReport::finished(result.with_issue(&issue));
        }

        match self.remote_log(&candidate.repo_path).await {
            Ok(remote) => match compare(&local, &remote) {
                BasisOutcome::UpToDate => {}
                BasisOutcome::Stale { reason } => {
                    return FileReport::finished(result.with_issue(&CheckIssue::StaleBasis(reason)));
                }
                BasisOutcome::Incomparable { reason } => {
                    return FileReport::finished(
                        result.with_issue(&CheckIssue::IncomparableRemote(reason)),
                    );
                }
            },
            Err(issue) => {
                warn!(path = %candidate.repo_path, %issue, "basis check skipped");
                result.push_issue(&issue);
            }
        }

        FileReport {
            cache_update: Some(CacheUpdate {
                repo_path: candidate.repo_path.clone(),
                hash,
                record_count: local.len(),
            }),
            result,
        }
    }

    async fn local_stage(
        &self,
        path: PathBuf,
        cached_hash: Option<String>,
    ) -> Result<LocalStage, CheckIssue> {
        let reader = self.reader.clone();
        tokio::task::spawn_blocking(move || {
            let hash = content_hash(&path)
                .map_err(|e| CheckIssue::LogRead(format!("{}: {e}", path.display())))?;
            if cached_hash.as_deref() == Some(hash.as_str()) {
                return Ok(LocalStage::Unchanged);
            }
            let log = reader
                .read(WorkbookSource::Path(&path))
                .map_err(local_issue)?;
            Ok(LocalStage::Read { hash, log })
        })
        .await
        .map_err(|e| CheckIssue::UnexpectedFault(e.to_string()))?
    }

    async fn remote_log(&self, repo_path: &str) -> Result<RevisionLog, CheckIssue> {
        let blob = self
            .vcs
            .fetch_remote_blob(repo_path)
            .await
            .map_err(|e| CheckIssue::RemoteUnavailable(e.to_string()))?;

        let reader = self.reader.clone();
        tokio::task::spawn_blocking(move || reader.read(WorkbookSource::Bytes(&blob)))
            .await
            .map_err(|e| CheckIssue::UnexpectedFault(e.to_string()))?
            .map_err(|e| CheckIssue::RemoteLogUnreadable(e.to_string()))
    }
}

fn local_issue(error: WorkbookError) -> CheckIssue {
    match error {
        WorkbookError::SheetNotFound { sheet } => CheckIssue::SheetNotFound { sheet },
        other => CheckIssue::LogRead(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;
    use std::path::Path;

    use pretty_assertions::assert_eq;
    use sheetgate_core::{CheckStatus, RevisionRecord};
    use sheetgate_hooks::HookError;
    use sheetgate_workbook::{CellValue, DataSheet, WorkbookBuilder};
    use tempfile::TempDir;

    use super::*;

    const SHEET: &str = "修改记录";

    #[derive(Default)]
    struct FakeRemote {
        blobs: HashMap<String, Vec<u8>>,
    }

    impl FakeRemote {
        fn with(path: &str, bytes: Vec<u8>) -> Self {
            let mut blobs = HashMap::new();
            blobs.insert(path.to_string(), bytes);
            Self { blobs }
        }
    }

    impl VersionControl for FakeRemote {
        async fn staged_files(&self) -> Result<Vec<String>, HookError> {
            Ok(Vec::new())
        }

        async fn fetch_remote_blob(&self, path: &str) -> Result<Vec<u8>, HookError> {
            self.blobs
                .get(path)
                .cloned()
                .ok_or_else(|| HookError::Git(format!("path '{path}' does not exist")))
        }
    }

    /// Every remote fetch exceeds the git timeout.
    struct SlowRemote;

    impl VersionControl for SlowRemote {
        async fn staged_files(&self) -> Result<Vec<String>, HookError> {
            Ok(Vec::new())
        }

        async fn fetch_remote_blob(&self, path: &str) -> Result<Vec<u8>, HookError> {
            Err(HookError::Timeout {
                command: format!("cat-file blob origin/main:{path}"),
                secs: 30,
            })
        }
    }

    fn record(author: &str, ts: &str, desc: &str, version: &str) -> RevisionRecord {
        RevisionRecord::new(author, ts, desc, version)
    }

    fn workbook(records: Vec<RevisionRecord>) -> Vec<u8> {
        WorkbookBuilder::new()
            .revision_sheet(SHEET, records)
            .to_bytes()
            .unwrap()
    }

    fn write_candidate(dir: &Path, bytes: &[u8]) -> Candidate {
        let path = dir.join("excels").join("a.xlsx");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, bytes).unwrap();
        Candidate::new(dir, path, "a.xlsx").expect("inside the project")
    }

    fn checker(remote: FakeRemote) -> FileChecker<FakeRemote> {
        FileChecker::new(remote, RevisionLogReader::new(SHEET))
    }

    #[tokio::test]
    async fn up_to_date_file_passes_and_updates_cache() {
        let dir = TempDir::new().unwrap();
        let a = record("A", "t1", "c1", "v1");
        let b = record("B", "t2", "c2", "v2");
        let candidate = write_candidate(dir.path(), &workbook(vec![a.clone(), b.clone()]));
        let remote = FakeRemote::with("excels/a.xlsx", workbook(vec![a, b]));

        let report = checker(remote).check(&candidate, None).await;
        assert_eq!(report.result.status, CheckStatus::Pass);
        assert!(report.result.warnings.is_empty());

        let update = report.cache_update.expect("cache update");
        assert_eq!(update.repo_path, "excels/a.xlsx");
        assert_eq!(update.record_count, 2);
        assert_eq!(update.hash, content_hash(&candidate.path).unwrap());
    }

    #[tokio::test]
    async fn unchanged_hash_skips_without_reading() {
        let dir = TempDir::new().unwrap();
        // Not a workbook: a read would fail, so a skip proves no read happened.
        let candidate = write_candidate(dir.path(), b"not a spreadsheet");
        let hash = content_hash(&candidate.path).unwrap();

        let report = checker(FakeRemote::default())
            .check(&candidate, Some(hash))
            .await;
        assert_eq!(report.result.status, CheckStatus::Skipped);
        assert!(report.cache_update.is_none());
    }

    #[tokio::test]
    async fn missing_sheet_is_an_error() {
        let dir = TempDir::new().unwrap();
        let bytes = WorkbookBuilder::new()
            .data_sheet(
                DataSheet::new("数据表1", vec!["序号".into()])
                    .row(vec![CellValue::Number(1.0)]),
            )
            .to_bytes()
            .unwrap();
        let candidate = write_candidate(dir.path(), &bytes);

        let report = checker(FakeRemote::default()).check(&candidate, None).await;
        assert_eq!(report.result.status, CheckStatus::Error);
        assert!(report.result.errors[0].contains(SHEET));
        assert!(report.cache_update.is_none());
    }

    #[tokio::test]
    async fn empty_log_is_an_error_even_with_remote() {
        let dir = TempDir::new().unwrap();
        let candidate = write_candidate(dir.path(), &workbook(Vec::new()));
        let remote = FakeRemote::with(
            "excels/a.xlsx",
            workbook(vec![record("A", "t1", "c1", "v1")]),
        );

        let report = checker(remote).check(&candidate, None).await;
        assert_eq!(report.result.status, CheckStatus::Error);
        assert_eq!(report.result.errors.len(), 1);
        assert!(report.result.errors[0].contains("empty"));
    }

    #[tokio::test]
    async fn corrupt_local_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let candidate = write_candidate(dir.path(), b"definitely not a zip");

        let report = checker(FakeRemote::default()).check(&candidate, None).await;
        assert_eq!(report.result.status, CheckStatus::Error);
        assert!(report.result.errors[0].starts_with("failed to read revision log"));
    }

    #[tokio::test]
    async fn missing_remote_passes_with_warning() {
        let dir = TempDir::new().unwrap();
        let candidate =
            write_candidate(dir.path(), &workbook(vec![record("A", "t1", "c1", "v1")]));

        let report = checker(FakeRemote::default()).check(&candidate, None).await;
        assert_eq!(report.result.status, CheckStatus::Pass);
        assert_eq!(report.result.warnings.len(), 1);
        assert!(report.result.warnings[0].starts_with("remote version unavailable"));
        assert_eq!(report.cache_update.unwrap().record_count, 1);
    }

    #[tokio::test]
    async fn remote_timeout_passes_with_warning() {
        let dir = TempDir::new().unwrap();
        let candidate =
            write_candidate(dir.path(), &workbook(vec![record("A", "t1", "c1", "v1")]));

        let report = FileChecker::new(SlowRemote, RevisionLogReader::new(SHEET))
            .check(&candidate, None)
            .await;
        assert_eq!(report.result.status, CheckStatus::Pass);
        assert!(report.result.errors.is_empty());
        assert_eq!(report.result.warnings.len(), 1);
        assert!(report.result.warnings[0].starts_with("remote version unavailable"));
        assert!(report.result.warnings[0].contains("timed out after 30s"));
        assert_eq!(report.cache_update.unwrap().record_count, 1);
    }

    #[tokio::test]
    async fn unreadable_remote_passes_with_warning() {
        let dir = TempDir::new().unwrap();
        let candidate =
            write_candidate(dir.path(), &workbook(vec![record("A", "t1", "c1", "v1")]));
        let remote = FakeRemote::with("excels/a.xlsx", b"garbage".to_vec());

        let report = checker(remote).check(&candidate, None).await;
        assert_eq!(report.result.status, CheckStatus::Pass);
        assert!(report.result.warnings[0].starts_with("remote revision log unreadable"));
    }

    #[tokio::test]
    async fn stale_basis_names_missing_record() {
        let dir = TempDir::new().unwrap();
        let a = record("A", "t1", "c1", "v1");
        let candidate = write_candidate(dir.path(), &workbook(vec![a.clone()]));
        let remote = FakeRemote::with(
            "excels/a.xlsx",
            workbook(vec![a, record("B", "t2", "c2", "v2")]),
        );

        let report = checker(remote).check(&candidate, None).await;
        assert_eq!(report.result.status, CheckStatus::Error);
        assert!(report.result.errors[0].contains("B - t2"));
        assert!(report.cache_update.is_none());
    }

    #[tokio::test]
    async fn version_label_is_ignored() {
        let dir = TempDir::new().unwrap();
        let a = record("A", "t1", "c1", "v1");
        let candidate = write_candidate(
            dir.path(),
            &workbook(vec![a.clone(), record("B", "t2", "c2", "v9")]),
        );
        let remote = FakeRemote::with(
            "excels/a.xlsx",
            workbook(vec![a, record("B", "t2", "c2", "v2")]),
        );

        let report = checker(remote).check(&candidate, None).await;
        assert_eq!(report.result.status, CheckStatus::Pass);
    }

    #[tokio::test]
    async fn empty_remote_log_is_incomparable() {
        let dir = TempDir::new().unwrap();
        let candidate =
            write_candidate(dir.path(), &workbook(vec![record("A", "t1", "c1", "v1")]));
        let remote = FakeRemote::with("excels/a.xlsx", workbook(Vec::new()));

        let report = checker(remote).check(&candidate, None).await;
        assert_eq!(report.result.status, CheckStatus::Error);
        assert!(report.result.errors[0].contains("remote has no revision history"));
    }

    #[tokio::test]
    async fn stale_cache_entry_is_rechecked() {
        let dir = TempDir::new().unwrap();
        let candidate =
            write_candidate(dir.path(), &workbook(vec![record("A", "t1", "c1", "v1")]));

        let report = checker(FakeRemote::default())
            .check(&candidate, Some("0000".into()))
            .await;
        assert_eq!(report.result.status, CheckStatus::Pass);
        assert!(report.cache_update.is_some());
    }
}
