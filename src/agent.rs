//! Reporting agent: pushes locally detected sessions to a server.
//!
//! Fire-and-forget on an interval. A failed report is logged and dropped;
//! the next tick carries fresh data anyway, so there is no retry queue.

use crate::data::RemoteSession;
use crate::detector::SessionDetector;
use crate::HTTP_CLIENT;
use anyhow::Result;
use serde_json::{json, Value};
use std::time::Duration;

/// Agent settings, resolved from flags and environment by the CLI.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub server_url: String,
    pub interval_ms: u64,
    pub machine_name: String,
}

/// Run the report loop forever. The first report fires immediately.
pub async fn run(config: AgentConfig) -> Result<()> {
    let detector = SessionDetector::new();
    let report_url = format!(
        "{}/api/sessions/report",
        config.server_url.trim_end_matches('/')
    );

    tracing::info!("Machine: {}", config.machine_name);
    tracing::info!("Reporting to: {}", report_url);
    tracing::info!("Interval: {}ms", config.interval_ms);

    let mut interval = tokio::time::interval(Duration::from_millis(config.interval_ms.max(1)));
    loop {
        interval.tick().await;
        if let Err(e) = report_once(&detector, &report_url, &config.machine_name).await {
            tracing::warn!("Error reporting sessions: {}", e);
        }
    }
}

/// One detection pass plus one POST to the server.
async fn report_once(
    detector: &SessionDetector,
    report_url: &str,
    machine_name: &str,
) -> Result<()> {
    let sessions: Vec<RemoteSession> = detector
        .detect()
        .await
        .into_iter()
        .map(|session| RemoteSession {
            session,
            machine_name: machine_name.to_string(),
        })
        .collect();
    let count = sessions.len();

    let response = HTTP_CLIENT
        .post(report_url)
        .json(&json!({ "sessions": sessions }))
        .send()
        .await?
        .error_for_status()?;

    let body: Value = response.json().await.unwrap_or_default();
    let received = body
        .get("received")
        .and_then(Value::as_u64)
        .unwrap_or(count as u64);
    tracing::info!("Reported {} session(s)", received);

    Ok(())
}
