use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use sheetgate_core::CacheEntry;
use thiserror::Error;
use tracing::debug;

const LAST_CHECK_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to read cache file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cache file '{path}' is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write cache file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize cache: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Content hashes of files that last passed, keyed by repository-relative path.
///
/// Loaded once per run, mutated only by the batch runner, persisted once.
#[derive(Debug, Clone)]
pub struct HashCache {
    path: PathBuf,
    entries: BTreeMap<String, CacheEntry>,
}

impl HashCache {
    /// An empty cache that persists to `path`.
    #[must_use]
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Load the cache file; a missing file yields an empty cache.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self::empty(path));
        }

        let raw = fs::read_to_string(&path).map_err(|source| CacheError::Read {
            path: path.clone(),
            source,
        })?;
        let entries = serde_json::from_str(&raw).map_err(|source| CacheError::Parse {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path, entries })
    }

    /// Like [`HashCache::load`], but an unreadable cache degrades to an empty
    /// one. The error is handed back so the caller can surface it.
    pub fn load_or_empty(path: impl Into<PathBuf>) -> (Self, Option<CacheError>) {
        let path = path.into();
        match Self::load(path.clone()) {
            Ok(cache) => (cache, None),
            Err(error) => (Self::empty(path), Some(error)),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(|entry| entry.hash.as_str())
    }

    #[must_use]
    pub fn entry(&self, path: &str) -> Option<&CacheEntry> {
        self.entries.get(path)
    }

    /// Overwrite the entry for `path`, stamping it with the local time.
    pub fn record(&mut self, path: impl Into<String>, hash: impl Into<String>, record_count: usize) {
        let entry = CacheEntry {
            hash: hash.into(),
            last_check: chrono::Local::now().format(LAST_CHECK_FORMAT).to_string(),
            record_count,
        };
        self.entries.insert(path.into(), entry);
    }

    /// Rewrite the cache file with the full mapping.
    pub fn persist(&self) -> Result<(), CacheError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| CacheError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        fs::write(&self.path, json).map_err(|source| CacheError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), entries = self.entries.len(), "cache persisted");
        Ok(())
    }
}

/// SHA-256 of the file's bytes as lowercase hex.
pub fn content_hash(path: &Path) -> std::io::Result<String> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0_u8; 8192];
    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
