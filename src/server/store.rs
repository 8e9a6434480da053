//! In-memory session store keyed by machine and session id.

use crate::data::RemoteSession;
use std::collections::HashMap;
use std::sync::Arc;

/// Millisecond clock, injectable so expiry is testable.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Latest reported session per `machine:session` key. Last write wins, no
/// versioning, nothing survives a restart.
pub struct SessionStore {
    sessions: HashMap<String, RemoteSession>,
    clock: Arc<dyn Clock>,
    expiry_ms: i64,
}

impl SessionStore {
    pub fn new(expiry_ms: i64) -> Self {
        Self::with_clock(expiry_ms, Arc::new(SystemClock))
    }

    /// Store with an injected clock (used for testing).
    pub fn with_clock(expiry_ms: i64, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: HashMap::new(),
            clock,
            expiry_ms,
        }
    }

    /// Insert or replace a session, lastActive included. The latest report
    /// always wins.
    pub fn upsert(&mut self, session: RemoteSession) {
        self.sessions.insert(session.key(), session);
    }

    /// Drop sessions whose last activity is older than the expiry window.
    /// An entry exactly at the window's edge is kept. Returns how many were
    /// removed.
    pub fn sweep(&mut self) -> usize {
        let now = self.clock.now_ms();
        let expiry = self.expiry_ms;
        let before = self.sessions.len();
        // lastActive is stored verbatim off the wire, so the age computation
        // has to tolerate the full i64 range
        self.sessions
            .retain(|_, s| now.saturating_sub(s.session.last_active) <= expiry);
        before - self.sessions.len()
    }

    /// All stored sessions, most recently active first.
    pub fn snapshot(&self) -> Vec<RemoteSession> {
        let mut sessions: Vec<RemoteSession> = self.sessions.values().cloned().collect();
        sessions.sort_by(|a, b| b.session.last_active.cmp(&a.session.last_active));
        sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::LocalSession;

    struct FixedClock(i64);

    impl Clock for FixedClock {
        fn now_ms(&self) -> i64 {
            self.0
        }
    }

    fn session(machine: &str, id: &str, last_active: i64) -> RemoteSession {
        RemoteSession {
            session: LocalSession {
                session_id: id.to_string(),
                title: format!("session {}", id),
                workspace_folder: "/proj".to_string(),
                git_repo: None,
                git_branch: None,
                current_activity: "Active".to_string(),
                last_active,
                is_active: true,
                ide_name: "VS Code".to_string(),
                pid: 1,
                message_count: 0,
            },
            machine_name: machine.to_string(),
        }
    }

    #[test]
    fn upsert_replaces_existing_key() {
        let mut store = SessionStore::with_clock(30_000, Arc::new(FixedClock(0)));
        store.upsert(session("m1", "s1", 100));
        store.upsert(session("m1", "s1", 200));

        assert_eq!(store.len(), 1);
        assert_eq!(store.snapshot()[0].session.last_active, 200);
    }

    #[test]
    fn same_session_id_on_two_machines_is_two_entries() {
        let mut store = SessionStore::with_clock(30_000, Arc::new(FixedClock(0)));
        store.upsert(session("m1", "s1", 100));
        store.upsert(session("m2", "s1", 100));

        assert_eq!(store.len(), 2);
    }

    #[test]
    fn sweep_is_strictly_greater_than() {
        let clock = Arc::new(FixedClock(100_000));
        let mut store = SessionStore::with_clock(30_000, clock);

        // exactly at the window edge: kept
        store.upsert(session("m1", "edge", 70_000));
        // one past the edge: removed
        store.upsert(session("m1", "stale", 69_999));
        // fresh: kept
        store.upsert(session("m1", "fresh", 99_000));

        let removed = store.sweep();
        assert_eq!(removed, 1);

        let keys: Vec<String> = store.snapshot().iter().map(|s| s.key()).collect();
        assert!(keys.contains(&"m1:edge".to_string()));
        assert!(keys.contains(&"m1:fresh".to_string()));
        assert!(!keys.contains(&"m1:stale".to_string()));
    }

    #[test]
    fn sweep_tolerates_extreme_last_active_values() {
        let mut store =
            SessionStore::with_clock(30_000, Arc::new(FixedClock(1_700_000_000_000)));
        store.upsert(session("m1", "ancient", i64::MIN));
        store.upsert(session("m1", "future", i64::MAX));

        // the ancient entry is expired immediately, the future-dated one
        // stays until the clock catches up
        assert_eq!(store.sweep(), 1);

        let keys: Vec<String> = store.snapshot().iter().map(|s| s.key()).collect();
        assert!(keys.contains(&"m1:future".to_string()));
        assert!(!keys.contains(&"m1:ancient".to_string()));
    }

    #[test]
    fn snapshot_sorts_most_recent_first() {
        let mut store = SessionStore::with_clock(30_000, Arc::new(FixedClock(0)));
        store.upsert(session("m1", "a", 100));
        store.upsert(session("m1", "b", 300));
        store.upsert(session("m2", "c", 200));

        let order: Vec<i64> = store
            .snapshot()
            .iter()
            .map(|s| s.session.last_active)
            .collect();
        assert_eq!(order, vec![300, 200, 100]);
    }

    #[test]
    fn sweep_on_empty_store_removes_nothing() {
        let mut store = SessionStore::with_clock(30_000, Arc::new(FixedClock(100_000)));
        assert_eq!(store.sweep(), 0);
        assert!(store.is_empty());
    }
}
