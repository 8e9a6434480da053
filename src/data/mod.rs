//! Wire types shared by the detector, server, agent, and watch client.
//!
//! Everything serializes camelCase to match the JSON Claude Code writes on
//! disk and the JSON agents exchange over HTTP.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One `ide/*.lock` file, written by the editor extension while an editor
/// process is attached. Valid only while `pid` is a live process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockRecord {
    pub pid: u32,
    #[serde(default)]
    pub workspace_folders: Vec<String>,
    #[serde(default)]
    pub ide_name: String,
    #[serde(default)]
    pub transport: String,
    #[serde(default)]
    pub running_in_windows: bool,
    #[serde(default)]
    pub auth_token: String,
}

/// One line of `history.jsonl`. The file is append-only; file order is the
/// only ordering that matters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(default)]
    pub display: String,
    #[serde(default)]
    pub pasted_contents: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Best-effort git state for a workspace folder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitInfo {
    pub repo_name: Option<String>,
    pub branch: Option<String>,
    pub is_dirty: bool,
}

/// A session detected on this machine. Rebuilt from scratch on every
/// detection pass, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalSession {
    pub session_id: String,
    pub title: String,
    pub workspace_folder: String,
    pub git_repo: Option<String>,
    pub git_branch: Option<String>,
    pub current_activity: String,
    /// Epoch milliseconds
    pub last_active: i64,
    pub is_active: bool,
    pub ide_name: String,
    pub pid: u32,
    pub message_count: u64,
}

/// A [`LocalSession`] plus the machine that reported it. Flattened so the
/// wire shape stays flat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSession {
    #[serde(flatten)]
    pub session: LocalSession,
    pub machine_name: String,
}

impl RemoteSession {
    /// Composite identity. Session ids are only unique per machine, so the
    /// aggregator keys on both.
    pub fn key(&self) -> String {
        format!("{}:{}", self.machine_name, self.session.session_id)
    }
}
