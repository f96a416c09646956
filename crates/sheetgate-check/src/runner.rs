use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use sheetgate_core::{BatchSummary, CheckIssue, CheckResult};
use sheetgate_hooks::VersionControl;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::cache::HashCache;
use crate::candidates::Candidate;
use crate::checker::{FileChecker, FileReport};

/// Progress callbacks, invoked on the orchestrating task.
pub trait BatchObserver: Send + Sync {
    fn on_start(&self, _total: usize, _workers: usize) {}
    fn on_result(&self, _result: &CheckResult) {}
    fn on_finish(&self, _summary: &BatchSummary) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl BatchObserver for SilentObserver {}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    /// Per-file results, sorted by path.
    pub results: Vec<CheckResult>,
    pub summary: BatchSummary,
    /// Set when nothing was eligible for checking.
    pub nothing_to_check: bool,
    /// Set when the cache could not be persisted. Never affects success.
    pub cache_warning: Option<String>,
}

impl BatchReport {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.summary.is_success()
    }
}

/// Fans the file checker out over a bounded pool of tokio tasks.
///
/// Workers see only their own path's cached hash and hand back cache
/// updates; the runner applies them and persists the cache once.
pub struct BatchRunner<'c, V> {
    cache: &'c mut HashCache,
    checker: Arc<FileChecker<V>>,
    max_workers: usize,
}

impl<'c, V: VersionControl> BatchRunner<'c, V> {
    pub fn new(cache: &'c mut HashCache, checker: Arc<FileChecker<V>>, max_workers: usize) -> Self {
        Self {
            cache,
            checker,
            max_workers: max_workers.max(1),
        }
    }

    pub async fn run(self, candidates: Vec<Candidate>, observer: &dyn BatchObserver) -> BatchReport {
        if candidates.is_empty() {
            info!("no spreadsheets to check");
            return BatchReport {
                nothing_to_check: true,
                ..BatchReport::default()
            };
        }

        observer.on_start(candidates.len(), self.max_workers);
        info!(
            files = candidates.len(),
            workers = self.max_workers,
            "checking spreadsheets"
        );

        let semaphore = Arc::new(Semaphore::new(self.max_workers));
        let mut set = JoinSet::new();
        let mut in_flight = HashMap::with_capacity(candidates.len());

        for candidate in candidates {
            let cached_hash = self.cache.lookup(&candidate.repo_path).map(str::to_string);
            let checker = Arc::clone(&self.checker);
            let sem = Arc::clone(&semaphore);
            let task_candidate = candidate.clone();
            let handle = set.spawn(async move {
                let Ok(_permit) = sem.acquire_owned().await else {
                    return FileReport {
                        result: CheckResult::pass(
                            &task_candidate.repo_path,
                            &task_candidate.display_name,
                        )
                        .with_issue(&CheckIssue::UnexpectedFault("worker pool closed".into())),
                        cache_update: None,
                    };
                };
                checker.check(&task_candidate, cached_hash).await
            });
            in_flight.insert(handle.id(), candidate);
        }

        let mut results = Vec::with_capacity(in_flight.len());
        while let Some(joined) = set.join_next_with_id().await {
            let result = match joined {
                Ok((id, report)) => {
                    in_flight.remove(&id);
                    if let Some(update) = report.cache_update {
                        self.cache
                            .record(update.repo_path, update.hash, update.record_count);
                    }
                    report.result
                }
                Err(error) => {
                    let candidate = in_flight.remove(&error.id());
                    warn!(%error, "check task failed");
                    fault_result(candidate.as_ref(), &error.to_string())
                }
            };
            observer.on_result(&result);
            results.push(result);
        }

        results.sort_by(|a, b| a.path.cmp(&b.path));
        let summary = BatchSummary::from_results(&results);

        let cache_warning = self.cache.persist().err().map(|error| {
            warn!(%error, "cache not saved");
            error.to_string()
        });
        debug!(entries = self.cache.len(), "cache updated");

        observer.on_finish(&summary);
        BatchReport {
            results,
            summary,
            nothing_to_check: false,
            cache_warning,
        }
    }
}

fn fault_result(candidate: Option<&Candidate>, message: &str) -> CheckResult {
    let (path, name) = candidate.map_or(("<unknown>", "<unknown>"), |c| {
        (c.repo_path.as_str(), c.display_name.as_str())
    });
    CheckResult::pass(path, name).with_issue(&CheckIssue::UnexpectedFault(message.to_string()))
}
