//! Checker settings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_sheet_name() -> String {
    "修改记录".to_string()
}

fn default_check_columns() -> Vec<String> {
    ["修订人", "修订时间", "修订内容"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Default worker pool size.
const fn default_max_threads() -> usize {
    10
}

/// Default remote fetch timeout in seconds.
const fn default_timeout_secs() -> u64 {
    30
}

fn default_excel_dir() -> String {
    "excels".to_string()
}

fn default_extension() -> String {
    "xlsx".to_string()
}

fn default_cache_file() -> String {
    ".excel_cache.json".to_string()
}

fn default_remote_ref() -> String {
    "@{upstream}".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SheetgateConfig {
    /// Name of the revision-log sheet every workbook must carry.
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,

    /// Expected header labels of the revision-log sheet. Informational only,
    /// never enforced against the actual header row.
    #[serde(default = "default_check_columns")]
    pub check_columns: Vec<String>,

    /// Worker pool size for batch checks.
    #[serde(default = "default_max_threads")]
    pub max_threads: usize,

    /// Upper bound, in seconds, for a single remote fetch.
    #[serde(default = "default_timeout_secs", rename = "timeout")]
    pub timeout_secs: u64,

    /// Directory scanned by `--all`, relative to the project root.
    #[serde(default = "default_excel_dir")]
    pub excel_dir: String,

    /// Spreadsheet file extension, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Hash cache file, relative to the project root.
    #[serde(default = "default_cache_file")]
    pub cache_file: String,

    /// Git revision whose blobs stand for "the remote".
    #[serde(default = "default_remote_ref")]
    pub remote_ref: String,
}

impl Default for SheetgateConfig {
    fn default() -> Self {
        Self {
            sheet_name: default_sheet_name(),
            check_columns: default_check_columns(),
            max_threads: default_max_threads(),
            timeout_secs: default_timeout_secs(),
            excel_dir: default_excel_dir(),
            extension: default_extension(),
            cache_file: default_cache_file(),
            remote_ref: default_remote_ref(),
        }
    }
}

impl SheetgateConfig {
    /// Reject values the checker cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sheet_name.trim().is_empty() {
            return Err(invalid("sheet_name", "must not be empty"));
        }
        if self.max_threads == 0 {
            return Err(invalid("max_threads", "must be a positive integer"));
        }
        if self.timeout_secs == 0 {
            return Err(invalid("timeout", "must be a positive number of seconds"));
        }
        if self.extension.trim_start_matches('.').is_empty() {
            return Err(invalid("extension", "must not be empty"));
        }
        if self.remote_ref.trim().is_empty() {
            return Err(invalid("remote_ref", "must not be empty"));
        }
        Ok(())
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Extension without a leading dot, lowercased.
    #[must_use]
    pub fn normalized_extension(&self) -> String {
        self.extension.trim_start_matches('.').to_ascii_lowercase()
    }

    #[must_use]
    pub fn excel_dir_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.excel_dir)
    }

    #[must_use]
    pub fn cache_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.cache_file)
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
