//! Terminal dashboard: polls a server and prints one card per session.
//!
//! A fetch failure prints an error line and keeps polling; the next tick is
//! the retry.

use crate::data::RemoteSession;
use crate::HTTP_CLIENT;
use anyhow::Result;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct SessionsResponse {
    sessions: Vec<RemoteSession>,
}

/// Watcher settings, resolved from flags and environment by the CLI.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub server_url: String,
    pub interval_ms: u64,
}

/// Poll the server and redraw until interrupted.
pub async fn run(config: WatchConfig) -> Result<()> {
    let url = format!("{}/api/sessions", config.server_url.trim_end_matches('/'));

    let mut interval = tokio::time::interval(Duration::from_millis(config.interval_ms.max(1)));
    loop {
        interval.tick().await;
        match fetch_sessions(&url).await {
            Ok(sessions) => render(&sessions),
            Err(e) => println!("Unable to reach {}: {} (retrying)", url, e),
        }
    }
}

async fn fetch_sessions(url: &str) -> Result<Vec<RemoteSession>> {
    let response: SessionsResponse = HTTP_CLIENT
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(response.sessions)
}

fn render(sessions: &[RemoteSession]) {
    let machines: HashSet<&str> = sessions.iter().map(|s| s.machine_name.as_str()).collect();

    println!();
    println!(
        "Claude Sessions | {} session(s) across {} machine(s) | updated {}",
        sessions.len(),
        machines.len(),
        chrono::Local::now().format("%H:%M:%S")
    );

    if sessions.is_empty() {
        println!("  No active sessions. Open a project and start Claude Code.");
        return;
    }

    for session in sessions {
        print_card(session);
    }
}

fn print_card(remote: &RemoteSession) {
    let s = &remote.session;
    let (context, percent) = context_level(s.message_count);

    println!();
    println!("  {} [{}]", s.title, remote.machine_name);
    println!("    {}", s.current_activity);
    match (&s.git_repo, &s.git_branch) {
        (Some(repo), Some(branch)) => println!("    {} on {}", repo, branch),
        (Some(repo), None) => println!("    {}", repo),
        _ => {}
    }
    println!("    {}", truncate_path(&s.workspace_folder, 50));
    println!(
        "    {} | {} message(s), context {} ({}%) | last active {} | pid {}",
        s.ide_name,
        s.message_count,
        context,
        percent,
        relative_time(s.last_active),
        s.pid
    );
}

/// Context-usage bucket for a message count. Rough approximation: most
/// sessions stay under 200 messages, so the percentage is against that cap.
fn context_level(message_count: u64) -> (&'static str, u64) {
    let percentage = (message_count / 2).min(100);
    let level = if message_count <= 50 {
        "low"
    } else if message_count <= 150 {
        "medium"
    } else {
        "high"
    };
    (level, percentage)
}

/// "Just now", then minutes, hours, days.
fn relative_time(epoch_ms: i64) -> String {
    relative_time_at(epoch_ms, chrono::Utc::now().timestamp_millis())
}

fn relative_time_at(epoch_ms: i64, now_ms: i64) -> String {
    // lastActive is whatever the reporter sent; the difference must not
    // overflow for any i64
    let minutes = now_ms.saturating_sub(epoch_ms) / 60_000;
    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / 1440)
    }
}

/// Collapse long paths to `first/.../parent/last`.
fn truncate_path(path: &str, max: usize) -> String {
    if path.len() <= max {
        return path.to_string();
    }
    let parts: Vec<&str> = path.split('/').collect();
    if parts.len() <= 3 {
        return path.to_string();
    }
    format!(
        "{}/.../{}/{}",
        parts[0],
        parts[parts.len() - 2],
        parts[parts.len() - 1]
    )
}
