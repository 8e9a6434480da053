//! Local session discovery.
//!
//! Correlates three things Claude Code leaves on disk:
//!
//! ```text
//! ~/.claude/
//! ├── ide/
//! │   └── <pid>.lock           <- one per attached editor process
//! ├── history.jsonl            <- append-only prompt log
//! └── debug/
//!     └── <sessionId>.txt      <- per-session debug log
//! ```
//!
//! A detection pass is a pure function of current filesystem state. Nothing
//! is cached between passes, and nothing here errors: missing directories,
//! malformed files, and dead processes all degrade to fewer sessions.

pub mod activity;
pub mod history;
pub mod locks;
pub mod process;

use crate::config::{self, DEFAULT_SESSION_TITLE};
use crate::data::{LocalSession, LockRecord};
use crate::git_info;
use chrono::Utc;
use history::{CaseSensitivity, HistoryIndex};
use process::ProcessProbe;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Discovers sessions on the machine it runs on.
pub struct SessionDetector {
    claude_dir: PathBuf,
    probe: Arc<dyn ProcessProbe>,
    case: CaseSensitivity,
}

impl SessionDetector {
    /// Detector for this machine's state directory ($CLAUDE_DIR or ~/.claude).
    pub fn new() -> Self {
        Self::with_root(config::claude_dir())
    }

    /// Detector rooted at a specific directory (used for testing).
    pub fn with_root(claude_dir: impl Into<PathBuf>) -> Self {
        Self {
            claude_dir: claude_dir.into(),
            probe: process::system_probe(),
            case: CaseSensitivity::platform_default(),
        }
    }

    /// Replace the process probe (used for testing).
    pub fn with_probe(mut self, probe: Arc<dyn ProcessProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Override path case handling (used for testing).
    pub fn with_case_sensitivity(mut self, case: CaseSensitivity) -> Self {
        self.case = case;
        self
    }

    /// Detect all sessions active on this machine right now, most recently
    /// active first.
    pub async fn detect(&self) -> Vec<LocalSession> {
        let locks = locks::read_live_locks(&self.claude_dir, self.probe.as_ref());
        let index = HistoryIndex::load(&self.claude_dir, self.case);

        let mut sessions = Vec::new();
        for lock in &locks {
            // One session per workspace folder. A multi-root editor window
            // holds several folders under a single lock and auth token.
            for folder in &lock.workspace_folders {
                sessions.push(self.build_session(lock, folder, &index).await);
            }
        }

        sessions.sort_by(|a, b| b.last_active.cmp(&a.last_active));

        tracing::debug!(
            "Detected {} session(s) from {} live lock(s)",
            sessions.len(),
            locks.len()
        );
        sessions
    }

    async fn build_session(
        &self,
        lock: &LockRecord,
        folder: &str,
        index: &HistoryIndex,
    ) -> LocalSession {
        let recent = index.most_recent(folder);

        // The history entry's own session id, when it has one. Identity
        // falls back to the lock's auth token; activity does not, so brand
        // new sessions read as starting up.
        let history_id = recent
            .and_then(|e| e.session_id.clone())
            .filter(|id| !id.is_empty());
        let session_id = history_id
            .clone()
            .unwrap_or_else(|| lock.auth_token.clone());

        let title = recent
            .map(|e| e.display.clone())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| DEFAULT_SESSION_TITLE.to_string());

        let last_active = recent
            .map(|e| e.timestamp)
            .filter(|&t| t != 0)
            .unwrap_or_else(|| Utc::now().timestamp_millis());

        let current_activity = activity::current_activity(&self.claude_dir, history_id.as_deref());
        let message_count = index.message_count(&session_id);

        let git = git_info::read(Path::new(folder)).await;

        LocalSession {
            session_id,
            title,
            workspace_folder: folder.to_string(),
            git_repo: git.repo_name,
            git_branch: git.branch,
            current_activity,
            last_active,
            is_active: true,
            ide_name: lock.ide_name.clone(),
            pid: lock.pid,
            message_count,
        }
    }
}

impl Default for SessionDetector {
    fn default() -> Self {
        Self::new()
    }
}
