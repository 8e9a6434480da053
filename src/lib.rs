//! Argus - Multi-machine dashboard for monitoring Claude Code sessions
//!
//! This library crate exposes internal modules for integration testing.

pub mod agent;
pub mod config;
pub mod data;
pub mod detector;
pub mod git_info;
pub mod server;
pub mod watch;

use once_cell::sync::Lazy;
use std::time::Duration;

/// Shared HTTP client for all requests to enable connection pooling
pub static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(5)
        .build()
        .expect("Failed to create HTTP client")
});
