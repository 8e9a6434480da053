//! Lock file scanning under `<claude dir>/ide/`.

use crate::data::LockRecord;
use crate::detector::process::ProcessProbe;
use std::fs;
use std::path::Path;

/// Read every parseable `*.lock` under `ide/` whose process is still running.
///
/// A missing directory, unreadable files, and malformed JSON all degrade to
/// fewer records, never errors.
pub fn read_live_locks(claude_dir: &Path, probe: &dyn ProcessProbe) -> Vec<LockRecord> {
    let ide_dir = claude_dir.join("ide");

    let entries = match fs::read_dir(&ide_dir) {
        Ok(e) => e,
        Err(_) => return Vec::new(),
    };

    let mut locks = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == "lock") {
            continue;
        }

        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!("Skipping unreadable lock file {}: {}", path.display(), e);
                continue;
            }
        };

        let record: LockRecord = match serde_json::from_str(&content) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("Skipping malformed lock file {}: {}", path.display(), e);
                continue;
            }
        };

        if probe.is_alive(record.pid) {
            locks.push(record);
        } else {
            tracing::debug!(
                "Skipping lock file {} for dead pid {}",
                path.display(),
                record.pid
            );
        }
    }

    locks
}
