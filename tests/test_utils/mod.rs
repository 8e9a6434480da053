#![allow(dead_code)]
//! Test fixtures: a fake Claude state directory built inside a tempdir.

use serde_json::json;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

/// Builds the on-disk layout the detector scans:
/// `ide/*.lock`, `history.jsonl`, and `debug/<sessionId>.txt`.
pub struct ClaudeDirBuilder {
    dir: TempDir,
}

impl ClaudeDirBuilder {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `ide/<name>.lock` for a single-folder session.
    pub fn lock_file(&self, name: &str, pid: u32, folder: &str, auth_token: &str) -> &Self {
        self.lock_file_with_folders(name, pid, &[folder], auth_token)
    }

    /// Write `ide/<name>.lock` listing several workspace folders.
    pub fn lock_file_with_folders(
        &self,
        name: &str,
        pid: u32,
        folders: &[&str],
        auth_token: &str,
    ) -> &Self {
        let record = json!({
            "pid": pid,
            "workspaceFolders": folders,
            "ideName": "VS Code",
            "transport": "ws",
            "runningInWindows": false,
            "authToken": auth_token,
        });
        let ide_dir = self.dir.path().join("ide");
        fs::create_dir_all(&ide_dir).expect("create ide dir");
        fs::write(ide_dir.join(format!("{}.lock", name)), record.to_string())
            .expect("write lock file");
        self
    }

    /// Append one line to `history.jsonl`.
    pub fn history_line(
        &self,
        display: &str,
        timestamp: i64,
        project: &str,
        session_id: Option<&str>,
    ) -> &Self {
        let mut entry = json!({
            "display": display,
            "pastedContents": {},
            "timestamp": timestamp,
            "project": project,
        });
        if let Some(id) = session_id {
            entry["sessionId"] = json!(id);
        }

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.dir.path().join("history.jsonl"))
            .expect("open history file");
        writeln!(file, "{}", entry).expect("append history line");
        self
    }

    /// Write `debug/<session_id>.txt` with the given lines, oldest first.
    pub fn debug_log(&self, session_id: &str, lines: &[&str]) -> &Self {
        let debug_dir = self.dir.path().join("debug");
        fs::create_dir_all(&debug_dir).expect("create debug dir");
        fs::write(
            debug_dir.join(format!("{}.txt", session_id)),
            lines.join("\n"),
        )
        .expect("write debug log");
        self
    }
}

impl Default for ClaudeDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}
