//! Fixed defaults and environment resolution.

use std::path::PathBuf;

/// Default port for the aggregation server
pub const DEFAULT_PORT: u16 = 3001;

/// Default server URL for agents and watchers
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3001";

/// Sessions that stop reporting for longer than this are swept
pub const SESSION_EXPIRY_MS: i64 = 30_000;

/// How often the server sweeps expired sessions
pub const SWEEP_INTERVAL_SECS: u64 = 10;

/// Default report/poll interval for agents and watchers
pub const DEFAULT_INTERVAL_MS: u64 = 5_000;

/// How many trailing debug-log lines to scan for activity
pub const DEBUG_TAIL_LINES: usize = 20;

/// Title for sessions with no history entries yet
pub const DEFAULT_SESSION_TITLE: &str = "New Session";

/// Default Claude state directory
fn default_claude_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".claude"))
        .unwrap_or_else(|| PathBuf::from("/tmp/.claude"))
}

/// Get the Claude state directory (respects $CLAUDE_DIR)
pub fn claude_dir() -> PathBuf {
    std::env::var("CLAUDE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_claude_dir())
}

/// Resolve the name this machine reports itself as.
///
/// Checks $MACHINE_NAME, then the `hostname` command, then the
/// HOSTNAME/COMPUTERNAME variables some shells export.
pub fn machine_name() -> String {
    if let Ok(name) = std::env::var("MACHINE_NAME") {
        let name = name.trim();
        if !name.is_empty() {
            return name.to_string();
        }
    }

    if let Ok(output) = std::process::Command::new("hostname").output() {
        let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if output.status.success() && !name.is_empty() {
            return name;
        }
    }

    std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .ok()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claude_dir_env_override() {
        std::env::set_var("CLAUDE_DIR", "/custom/claude");
        assert_eq!(claude_dir(), PathBuf::from("/custom/claude"));
        std::env::remove_var("CLAUDE_DIR");
        assert!(claude_dir().to_string_lossy().contains(".claude"));
    }

    #[test]
    fn test_machine_name_env_override() {
        std::env::set_var("MACHINE_NAME", "test-box");
        assert_eq!(machine_name(), "test-box");
        std::env::remove_var("MACHINE_NAME");
    }

    #[test]
    fn test_machine_name_never_empty() {
        // Whatever the fallback chain resolves to, it is a usable name
        assert!(!machine_name().is_empty());
    }
}
