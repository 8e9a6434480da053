//! Current-activity inference from session debug logs.
//!
//! Claude Code appends to `debug/<sessionId>.txt` as it works. The tail of
//! that file is the closest thing to a live status line, so the newest line
//! with a recognizable marker decides the activity.

use crate::config::DEBUG_TAIL_LINES;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

static TOOL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Tool:\s*(\w+)").expect("invalid regex"));

/// Shown before a session has produced any history
pub const STARTING: &str = "Starting...";
/// Fallback when there is no debug log or nothing in its tail matches
pub const ACTIVE: &str = "Active";

/// Infer what a session is doing right now.
///
/// `session_id` is the id from the session's history entry; a session that
/// has not written history yet has none and reads as starting up.
pub fn current_activity(claude_dir: &Path, session_id: Option<&str>) -> String {
    let Some(session_id) = session_id else {
        return STARTING.to_string();
    };

    let path = claude_dir.join("debug").join(format!("{}.txt", session_id));
    let content = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(_) => return ACTIVE.to_string(),
    };

    let lines: Vec<&str> = content.trim().lines().collect();
    let tail_start = lines.len().saturating_sub(DEBUG_TAIL_LINES);

    classify_tail(lines[tail_start..].iter().rev().copied()).unwrap_or_else(|| ACTIVE.to_string())
}

/// First classifiable line wins. Callers pass lines newest first.
pub fn classify_tail<'a>(lines: impl Iterator<Item = &'a str>) -> Option<String> {
    lines.into_iter().find_map(classify_line)
}

fn classify_line(line: &str) -> Option<String> {
    if let Some(caps) = TOOL_RE.captures(line) {
        return Some(format!("Using {} tool", &caps[1]));
    }
    if line.contains("Reading file:") || line.contains("read file") {
        return Some("Reading files".to_string());
    }
    if line.contains("Writing file:") || line.contains("write file") {
        return Some("Writing files".to_string());
    }
    if line.contains("Editing file:") || line.contains("edit file") {
        return Some("Editing files".to_string());
    }
    if line.contains("Running command:") || line.contains("bash:") {
        return Some("Running commands".to_string());
    }
    if line.contains("Agent:") || line.contains("Task:") {
        return Some("Running agent".to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_debug(dir: &TempDir, session_id: &str, lines: &[&str]) {
        let debug_dir = dir.path().join("debug");
        fs::create_dir_all(&debug_dir).unwrap();
        fs::write(
            debug_dir.join(format!("{}.txt", session_id)),
            lines.join("\n"),
        )
        .unwrap();
    }

    #[test]
    fn no_session_id_reads_starting() {
        let dir = TempDir::new().unwrap();
        assert_eq!(current_activity(dir.path(), None), STARTING);
    }

    #[test]
    fn missing_debug_file_reads_active() {
        let dir = TempDir::new().unwrap();
        assert_eq!(current_activity(dir.path(), Some("s1")), ACTIVE);
    }

    #[test]
    fn tool_lines_name_the_tool() {
        let dir = TempDir::new().unwrap();
        write_debug(&dir, "s1", &["Tool: Grep"]);
        assert_eq!(current_activity(dir.path(), Some("s1")), "Using Grep tool");
    }

    #[test]
    fn newest_matching_line_wins() {
        let dir = TempDir::new().unwrap();
        write_debug(&dir, "s1", &["Tool: bash", "Reading file: x.ts"]);
        assert_eq!(current_activity(dir.path(), Some("s1")), "Reading files");
    }

    #[test]
    fn unmatched_tail_reads_active() {
        let dir = TempDir::new().unwrap();
        write_debug(&dir, "s1", &["connecting to workspace", "handshake ok"]);
        assert_eq!(current_activity(dir.path(), Some("s1")), ACTIVE);
    }

    #[test]
    fn lines_outside_the_tail_are_ignored() {
        let dir = TempDir::new().unwrap();
        let mut lines = vec!["Tool: Grep"];
        let noise = vec!["noise"; DEBUG_TAIL_LINES];
        lines.extend(noise);
        write_debug(&dir, "s1", &lines);
        assert_eq!(current_activity(dir.path(), Some("s1")), ACTIVE);
    }

    #[test]
    fn classify_covers_each_marker() {
        let cases = [
            ("Writing file: src/lib.rs", "Writing files"),
            ("will edit file next", "Editing files"),
            ("Running command: ls", "Running commands"),
            ("bash: cargo fmt", "Running commands"),
            ("Agent: explorer", "Running agent"),
            ("Task: summarize", "Running agent"),
        ];
        for (line, expected) in cases {
            assert_eq!(classify_tail([line].into_iter()).as_deref(), Some(expected));
        }
    }

    #[test]
    fn tool_marker_without_name_falls_through() {
        // "Tool:" with nothing capturable after it should not swallow the line
        assert_eq!(
            classify_tail(["Tool: ... bash: make"].into_iter()).as_deref(),
            Some("Running commands")
        );
    }
}
