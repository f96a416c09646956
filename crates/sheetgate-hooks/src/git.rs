use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::error::HookError;

/// The two version-control queries the checker depends on.
pub trait VersionControl: Send + Sync + 'static {
    /// Paths staged as added, copied or modified, relative to the repository root.
    fn staged_files(&self) -> impl Future<Output = Result<Vec<String>, HookError>> + Send;

    /// Content of `path` (repository-relative) as last known to the remote.
    fn fetch_remote_blob(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<Vec<u8>, HookError>> + Send;
}

/// `VersionControl` backed by the `git` executable.
///
/// Every invocation is bounded by `timeout`; on expiry the child process is
/// killed and [`HookError::Timeout`] is returned.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_root: PathBuf,
    remote_ref: String,
    timeout: Duration,
}

impl GitCli {
    #[must_use]
    pub fn new(repo_root: impl Into<PathBuf>, remote_ref: impl Into<String>, timeout: Duration) -> Self {
        Self {
            repo_root: repo_root.into(),
            remote_ref: remote_ref.into(),
            timeout,
        }
    }

    #[must_use]
    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    #[must_use]
    pub fn remote_ref(&self) -> &str {
        &self.remote_ref
    }

    async fn run(&self, args: &[&str]) -> Result<Vec<u8>, HookError> {
        let mut command = Command::new("git");
        command
            .args(args)
            .current_dir(&self.repo_root)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| HookError::Timeout {
                command: args.join(" "),
                secs: self.timeout.as_secs(),
            })?
            .map_err(|e| HookError::Git(format!("run git {}: {e}", args.join(" "))))?;

        if !output.status.success() {
            return Err(HookError::Git(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(output.stdout)
    }
}

impl VersionControl for GitCli {
    async fn staged_files(&self) -> Result<Vec<String>, HookError> {
        let stdout = self
            .run(&[
                "diff",
                "--cached",
                "--name-only",
                "--diff-filter=ACM",
                "-z",
            ])
            .await?;

        let files = stdout
            .split(|byte| *byte == 0)
            .filter(|entry| !entry.is_empty())
            .map(|entry| String::from_utf8_lossy(entry).to_string())
            .collect::<Vec<_>>();
        debug!(count = files.len(), "staged files");
        Ok(files)
    }

    async fn fetch_remote_blob(&self, path: &str) -> Result<Vec<u8>, HookError> {
        let spec = format!("{}:{path}", self.remote_ref);
        let blob = self.run(&["cat-file", "blob", &spec]).await?;
        debug!(%spec, bytes = blob.len(), "fetched remote blob");
        Ok(blob)
    }
}
