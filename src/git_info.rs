//! Best-effort git state for workspace folders.
//!
//! Everything shells out to `git`. Any failure (no repo, no git binary,
//! permission problems, corrupt metadata) reports as "not a repository"
//! rather than an error.

use crate::data::GitInfo;
use std::path::Path;
use tokio::process::Command;

/// Read repository name, current branch, and dirty flag for a directory.
///
/// All-or-nothing: a command failure after the repository check (an unborn
/// HEAD, say) reports the same as no repository at all, never a partial
/// result.
pub async fn read(dir: &Path) -> GitInfo {
    if !dir.exists() || !is_work_tree(dir).await {
        return GitInfo::default();
    }

    match read_work_tree(dir).await {
        Some(info) => info,
        None => {
            tracing::debug!(
                "Incomplete git read for {}, reporting no git context",
                dir.display()
            );
            GitInfo::default()
        }
    }
}

async fn read_work_tree(dir: &Path) -> Option<GitInfo> {
    let branch = git_stdout(dir, &["rev-parse", "--abbrev-ref", "HEAD"]).await?;
    let repo_name = read_repo_name(dir).await;
    let status = git_stdout(dir, &["status", "--porcelain"]).await?;

    Some(GitInfo {
        repo_name,
        branch: Some(branch).filter(|b| !b.is_empty()),
        is_dirty: !status.is_empty(),
    })
}

async fn is_work_tree(dir: &Path) -> bool {
    git_stdout(dir, &["rev-parse", "--is-inside-work-tree"])
        .await
        .is_some_and(|out| out == "true")
}

/// Repository name from the first remote's fetch URL, falling back to the
/// directory's base name.
async fn read_repo_name(dir: &Path) -> Option<String> {
    if let Some(remotes) = git_stdout(dir, &["remote"]).await {
        if let Some(first) = remotes.lines().next().filter(|r| !r.is_empty()) {
            if let Some(url) = git_stdout(dir, &["remote", "get-url", first]).await {
                if let Some(name) = repo_name_from_url(&url) {
                    return Some(name);
                }
            }
        }
    }

    dir.file_name().map(|n| n.to_string_lossy().to_string())
}

/// Last path segment of a remote URL with any `.git` suffix stripped.
///
/// Works for both `https://host/owner/repo.git` and
/// `git@host:owner/repo.git`. URLs without a `/` fall through to the
/// directory-name fallback.
fn repo_name_from_url(url: &str) -> Option<String> {
    let trimmed = url.trim().trim_end_matches('/');
    let (_, segment) = trimmed.rsplit_once('/')?;
    let name = segment.trim_end_matches(".git");
    (!name.is_empty()).then(|| name.to_string())
}

/// Run git in `dir` and return trimmed stdout, or None on any failure.
async fn git_stdout(dir: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        return None;
    }

    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
