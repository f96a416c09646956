//! Which files a run checks.
//!
//! Three sources: a scan of the spreadsheet directory, an explicit list, or
//! the files staged for commit. Staged-file failures fall back to the scan.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use sheetgate_hooks::VersionControl;
use tracing::{debug, warn};

/// Office writes `~$name.xlsx` lock files next to open workbooks.
const LOCK_FILE_PREFIX: &str = "~$";

/// One file to check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// Filesystem path the local copy is read from.
    pub path: PathBuf,
    /// Repository-relative path with `/` separators: cache key and remote blob path.
    pub repo_path: String,
    /// Name shown in output.
    pub display_name: String,
}

impl Candidate {
    /// `None` when `path` does not lie inside `project_root`.
    #[must_use]
    pub fn new(
        project_root: &Path,
        path: PathBuf,
        display_name: impl Into<String>,
    ) -> Option<Self> {
        Some(Self {
            repo_path: repo_relative(project_root, &path)?,
            path,
            display_name: display_name.into(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSelection {
    pub candidates: Vec<Candidate>,
    /// Human-readable notices gathered during selection (skipped paths, fallbacks).
    pub notices: Vec<String>,
}

impl CandidateSelection {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Every file directly under `dir` with the given extension, sorted by path.
///
/// A missing directory yields no candidates.
#[must_use]
pub fn scan_directory(project_root: &Path, dir: &Path, extension: &str) -> Vec<Candidate> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(error) => {
            debug!(dir = %dir.display(), %error, "spreadsheet directory not readable");
            return Vec::new();
        }
    };

    let mut candidates = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|kind| kind.is_file()))
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            if !is_spreadsheet(&name, extension) {
                return None;
            }
            let candidate = Candidate::new(project_root, entry.path(), name);
            if candidate.is_none() {
                debug!(path = %entry.path().display(), "outside the project root, skipped");
            }
            candidate
        })
        .collect::<Vec<_>>();
    candidates.sort_by(|a, b| a.path.cmp(&b.path));
    candidates
}

/// Files named on the command line, relative paths resolved against `cwd`.
/// Missing files and files outside the project are reported and skipped;
/// the extension is not enforced.
#[must_use]
pub fn explicit_files(
    project_root: &Path,
    cwd: &Path,
    files: &[PathBuf],
) -> CandidateSelection {
    let mut selection = CandidateSelection::default();
    for file in files {
        let path = if file.is_absolute() {
            file.clone()
        } else {
            cwd.join(file)
        };
        if !path.is_file() {
            selection
                .notices
                .push(format!("{}: file not found, skipped", file.display()));
            continue;
        }
        let display_name = file
            .file_name()
            .map_or_else(|| file.display().to_string(), |n| n.to_string_lossy().to_string());
        match Candidate::new(project_root, path, display_name) {
            Some(candidate) => selection.candidates.push(candidate),
            None => selection.notices.push(format!(
                "{}: outside the project at {}, skipped",
                file.display(),
                project_root.display()
            )),
        }
    }
    selection
}

/// Spreadsheets staged for commit. If the staged query fails, every
/// spreadsheet in `fallback_dir` is selected instead.
pub async fn staged_files<V: VersionControl>(
    vcs: &V,
    project_root: &Path,
    fallback_dir: &Path,
    extension: &str,
) -> CandidateSelection {
    match vcs.staged_files().await {
        Ok(staged) => {
            let candidates = staged
                .into_iter()
                .filter(|repo_path| {
                    let name = repo_path.rsplit('/').next().unwrap_or(repo_path);
                    is_spreadsheet(name, extension)
                })
                .filter_map(|repo_path| {
                    let path = project_root.join(&repo_path);
                    path.is_file().then(|| Candidate {
                        path,
                        display_name: repo_path.clone(),
                        repo_path,
                    })
                })
                .collect();
            CandidateSelection {
                candidates,
                notices: Vec::new(),
            }
        }
        Err(error) => {
            warn!(%error, "staged file query failed, checking every spreadsheet");
            CandidateSelection {
                candidates: scan_directory(project_root, fallback_dir, extension),
                notices: vec![format!(
                    "could not list staged files ({error}), checking all spreadsheets"
                )],
            }
        }
    }
}

fn is_spreadsheet(file_name: &str, extension: &str) -> bool {
    if file_name.starts_with(LOCK_FILE_PREFIX) {
        return false;
    }
    Path::new(file_name)
        .extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
}

/// `path` relative to `project_root` with `/` separators.
///
/// Both paths are normalized lexically first; if that does not place `path`
/// under the root (symlinked directories), the canonical paths are tried.
fn repo_relative(project_root: &Path, path: &Path) -> Option<String> {
    let relative = normalize(path)
        .strip_prefix(normalize(project_root))
        .map(Path::to_path_buf)
        .ok()
        .or_else(|| {
            let root = project_root.canonicalize().ok()?;
            let path = path.canonicalize().ok()?;
            path.strip_prefix(root).map(Path::to_path_buf).ok()
        })?;

    let parts = relative
        .components()
        .map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().to_string()),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    (!parts.is_empty()).then(|| parts.join("/"))
}

/// Resolve `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out
}
