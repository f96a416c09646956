//! Throwaway git repositories for tests (git CLI for setup).

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

pub fn init_temp_repo() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::TempDir::new().expect("create tempdir");
    let repo_path = dir.path().to_path_buf();

    run_git(&repo_path, &["init", "--initial-branch=main"]);
    for (key, val) in [
        ("user.email", "test@sheetgate.dev"),
        ("user.name", "Sheetgate Test"),
        ("commit.gpgsign", "false"),
    ] {
        run_git(&repo_path, &["config", key, val]);
    }

    (dir, repo_path)
}

pub fn commit_file(repo_path: &Path, filename: &str, content: &str, message: &str) {
    let file_path = repo_path.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&file_path, content).unwrap();
    run_git(repo_path, &["add", filename]);
    run_git(repo_path, &["commit", "-q", "-m", message]);
}

pub fn run_git(repo_path: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .output()
        .unwrap_or_else(|e| panic!("git {} failed: {}", args.join(" "), e));
    assert!(
        output.status.success(),
        "git {} failed:\nstdout: {}\nstderr: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}
