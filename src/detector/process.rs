//! Process liveness probes.
//!
//! Lock files outlive their editor: a crash leaves the `.lock` behind with a
//! stale pid. Every lock record is checked against a live process before it
//! becomes a session.

use std::sync::Arc;

/// Answers "does this pid belong to a running editor process?"
pub trait ProcessProbe: Send + Sync {
    fn is_alive(&self, pid: u32) -> bool;
}

/// Probe for the current platform.
pub fn system_probe() -> Arc<dyn ProcessProbe> {
    #[cfg(unix)]
    {
        Arc::new(UnixProbe)
    }
    #[cfg(windows)]
    {
        Arc::new(WindowsProbe)
    }
    #[cfg(not(any(unix, windows)))]
    {
        Arc::new(NeverAlive)
    }
}

/// Zero-signal probe: `kill(pid, 0)` succeeds iff the process exists and we
/// may signal it.
#[cfg(unix)]
pub struct UnixProbe;

#[cfg(unix)]
impl ProcessProbe for UnixProbe {
    fn is_alive(&self, pid: u32) -> bool {
        unsafe { libc::kill(pid as i32, 0) == 0 }
    }
}

/// `tasklist` lookup filtered to the editor host processes (node, code).
#[cfg(windows)]
pub struct WindowsProbe;

#[cfg(windows)]
impl ProcessProbe for WindowsProbe {
    fn is_alive(&self, pid: u32) -> bool {
        let output = std::process::Command::new("tasklist")
            .args(["/FI", &format!("PID eq {}", pid), "/NH"])
            .output();

        match output {
            Ok(out) => {
                let stdout = String::from_utf8_lossy(&out.stdout).to_lowercase();
                stdout.contains("node") || stdout.contains("code")
            }
            Err(_) => false,
        }
    }
}

#[cfg(not(any(unix, windows)))]
pub struct NeverAlive;

#[cfg(not(any(unix, windows)))]
impl ProcessProbe for NeverAlive {
    fn is_alive(&self, _pid: u32) -> bool {
        false
    }
}

/// Closure-backed probe (used for testing).
pub struct FnProbe<F>(pub F);

impl<F> ProcessProbe for FnProbe<F>
where
    F: Fn(u32) -> bool + Send + Sync,
{
    fn is_alive(&self, pid: u32) -> bool {
        (self.0)(pid)
    }
}
