// File: janitor/src/main.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use janitor::{ConfigManager, Janitor};

#[derive(Debug, Parser)]
#[command(name = "janitor", version, about = "Cloud account maintenance jobs")]
struct Cli {
    /// Optional TOML configuration file; environment variables take precedence
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Find and optionally delete stale snapshots
    Cleanup {
        /// Invocation event as JSON, e.g. '{"retention_days": 60, "dry_run": false}'
        #[arg(long, conflicts_with = "event_file")]
        event: Option<String>,

        /// Read the invocation event from a JSON file
        #[arg(long)]
        event_file: Option<PathBuf>,
    },
    /// Snapshot the given volumes and send a notification per snapshot
    Snapshot {
        #[arg(required = true)]
        volume_ids: Vec<String>,
    },
    /// Start or stop tagged databases according to business hours
    Schedule,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_manager = ConfigManager::load(cli.config.as_deref()).await?;
    let settings = config_manager.get_current_settings();

    let env_filter = match std::env::var("RUST_LOG") {
        Ok(directives) if !directives.is_empty() => EnvFilter::new(directives),
        _ => EnvFilter::new(format!("janitor={}", settings.log_level.as_directive()))
            .add_directive("reqwest=warn".parse()?)
            .add_directive("hyper=warn".parse()?),
    };
    fmt().with_env_filter(env_filter).init();

    info!("Starting janitor");
    config_manager.log_summary();

    let janitor = Janitor::connect(settings)?;

    match cli.command {
        Command::Cleanup { event, event_file } => {
            let event = read_event(event, event_file).await?;
            print_json(&janitor.cleanup(&event).await)?;
        }
        Command::Snapshot { volume_ids } => {
            print_json(&janitor.snapshot(&volume_ids).await)?;
        }
        Command::Schedule => {
            print_json(&janitor.schedule().await)?;
        }
    }

    Ok(())
}

async fn read_event(inline: Option<String>, file: Option<PathBuf>) -> Result<Value> {
    let raw = match (inline, file) {
        (Some(raw), _) => raw,
        (None, Some(path)) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read event file {}", path.display()))?,
        (None, None) => return Ok(Value::Null),
    };

    serde_json::from_str(&raw).context("Invocation event is not valid JSON")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
