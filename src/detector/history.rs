//! History log indexing.
//!
//! `history.jsonl` is append-only, one JSON object per line. File order is
//! the only ordering that matters: the last line for a project is that
//! project's most recent entry, even when timestamps disagree.

use crate::data::HistoryEntry;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Case handling for workspace-path comparisons.
///
/// Lock files and history entries can record the same workspace with
/// different casing. On filesystems that are case-insensitive by default
/// (macOS, Windows) those must match; elsewhere they are distinct paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseSensitivity {
    Sensitive,
    Insensitive,
}

impl CaseSensitivity {
    /// Default for the build platform.
    pub fn platform_default() -> Self {
        if cfg!(any(target_os = "macos", target_os = "windows")) {
            Self::Insensitive
        } else {
            Self::Sensitive
        }
    }

    /// Normalize one side of a path comparison. Applied to both the entry's
    /// project path and the lookup key.
    pub fn normalize(&self, path: &str) -> String {
        match self {
            Self::Insensitive => path.to_lowercase(),
            Self::Sensitive => path.to_string(),
        }
    }
}

/// Per-project entries and per-session counts, built from one read of
/// `history.jsonl`.
#[derive(Debug)]
pub struct HistoryIndex {
    /// Entries grouped by normalized project path, in file order.
    by_project: HashMap<String, Vec<HistoryEntry>>,
    /// Number of entries carrying each session id.
    counts_by_session: HashMap<String, u64>,
    case: CaseSensitivity,
}

impl HistoryIndex {
    /// Load from `<claude dir>/history.jsonl`. A missing file or malformed
    /// lines degrade to an emptier index, never errors.
    pub fn load(claude_dir: &Path, case: CaseSensitivity) -> Self {
        let mut index = Self {
            by_project: HashMap::new(),
            counts_by_session: HashMap::new(),
            case,
        };

        let path = claude_dir.join("history.jsonl");
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => return index,
        };

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let entry: HistoryEntry = match serde_json::from_str(line) {
                Ok(e) => e,
                Err(e) => {
                    tracing::debug!("Skipping malformed history line: {}", e);
                    continue;
                }
            };

            if let Some(id) = entry.session_id.as_deref() {
                if !id.is_empty() {
                    *index.counts_by_session.entry(id.to_string()).or_insert(0) += 1;
                }
            }

            index
                .by_project
                .entry(case.normalize(&entry.project))
                .or_default()
                .push(entry);
        }

        index
    }

    /// Most recent entry for a workspace folder: the last line in file
    /// order, not the entry with the largest timestamp.
    pub fn most_recent(&self, workspace_folder: &str) -> Option<&HistoryEntry> {
        self.by_project
            .get(&self.case.normalize(workspace_folder))
            .and_then(|entries| entries.last())
    }

    /// How many history lines carry this session id, across all projects.
    pub fn message_count(&self, session_id: &str) -> u64 {
        self.counts_by_session
            .get(session_id)
            .copied()
            .unwrap_or(0)
    }
}
