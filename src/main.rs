use anyhow::Result;
use argus::{agent, config, detector, server, watch};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "argus")]
#[command(about = "Multi-machine dashboard for Claude Code sessions")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the aggregation server
    Serve {
        /// Port to listen on
        #[arg(long, default_value_t = config::DEFAULT_PORT)]
        port: u16,

        /// Name this machine reports itself as (defaults to hostname)
        #[arg(long)]
        machine: Option<String>,
    },
    /// Report local sessions to a server on an interval
    Agent {
        /// Server base URL
        #[arg(long, env = "SERVER_URL", default_value = config::DEFAULT_SERVER_URL)]
        server: String,

        /// Milliseconds between reports
        #[arg(long, env = "REPORT_INTERVAL", default_value_t = config::DEFAULT_INTERVAL_MS)]
        interval: u64,

        /// Name this machine reports itself as (defaults to hostname)
        #[arg(long)]
        machine: Option<String>,
    },
    /// Poll a server and print session cards
    Watch {
        /// Server base URL
        #[arg(long, env = "SERVER_URL", default_value = config::DEFAULT_SERVER_URL)]
        server: String,

        /// Milliseconds between polls
        #[arg(long, default_value_t = config::DEFAULT_INTERVAL_MS)]
        interval: u64,
    },
    /// Detect local sessions once and print them
    Sessions {
        /// Print raw JSON instead of cards
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("argus=info".parse()?),
        )
        .init();

    match args.command {
        Command::Serve { port, machine } => {
            let machine = machine.unwrap_or_else(config::machine_name);
            server::run(port, machine).await
        }
        Command::Agent {
            server,
            interval,
            machine,
        } => {
            let machine = machine.unwrap_or_else(config::machine_name);
            agent::run(agent::AgentConfig {
                server_url: server,
                interval_ms: interval,
                machine_name: machine,
            })
            .await
        }
        Command::Watch { server, interval } => {
            watch::run(watch::WatchConfig {
                server_url: server,
                interval_ms: interval,
            })
            .await
        }
        Command::Sessions { json } => dump_sessions(json).await,
    }
}

/// One-shot local detection, printed for humans or as JSON.
async fn dump_sessions(json: bool) -> Result<()> {
    let sessions = detector::SessionDetector::new().detect().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!("No active sessions found.");
        println!();
        println!("Possible reasons:");
        println!("  - No editor with the Claude Code extension is running");
        println!("  - Lock files point at processes that have exited");
        println!(
            "  - {} does not exist on this machine",
            config::claude_dir().display()
        );
        return Ok(());
    }

    println!("Found {} session(s):", sessions.len());
    for session in &sessions {
        println!();
        println!("  {}", session.title);
        println!("    Workspace: {}", session.workspace_folder);
        if let Some(repo) = &session.git_repo {
            match &session.git_branch {
                Some(branch) => println!("    Git: {} ({})", repo, branch),
                None => println!("    Git: {}", repo),
            }
        }
        println!("    Messages: {}", session.message_count);
        println!("    Activity: {}", session.current_activity);
        println!("    IDE: {} (pid {})", session.ide_name, session.pid);
    }

    Ok(())
}
