//! Pipewatch CLI
//!
//! Command-line interface for inspecting and watching pipeline jobs.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pipewatch")]
#[command(about = "Watch multi-stage pipeline jobs until they settle", long_about = None)]
struct Cli {
    /// Pipeline API URL
    #[arg(long, env = "PIPEWATCH_API_URL")]
    api_url: Option<String>,

    /// Polling interval in milliseconds
    #[arg(long, env = "POLL_INTERVAL_MS")]
    interval_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pipewatch=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = config::load(cli.api_url, cli.interval_ms)?;

    handle_command(cli.command, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipewatch_core::domain::job::JobId;
    use pipewatch_core::domain::status::Stage;

    #[test]
    fn test_parse_watch_command() {
        let cli = Cli::try_parse_from(["pipewatch", "--interval-ms", "1500", "watch", "42", "43"])
            .unwrap();
        assert_eq!(cli.interval_ms, Some(1500));
        match cli.command {
            Commands::Watch { job_ids } => assert_eq!(job_ids, vec![JobId(42), JobId(43)]),
            _ => panic!("expected watch command"),
        }
    }

    #[test]
    fn test_parse_start_command() {
        let cli = Cli::try_parse_from(["pipewatch", "start", "7", "legal_resolution"]).unwrap();
        match cli.command {
            Commands::Start { job_id, stage } => {
                assert_eq!(job_id, JobId(7));
                assert_eq!(stage, Stage::LegalResolution);
            }
            _ => panic!("expected start command"),
        }
    }

    #[test]
    fn test_rejects_unknown_stage() {
        assert!(Cli::try_parse_from(["pipewatch", "start", "7", "reporting"]).is_err());
    }

    #[test]
    fn test_parse_report_command() {
        let cli = Cli::try_parse_from(["pipewatch", "report", "12", "--json"]).unwrap();
        match cli.command {
            Commands::Report { job_id, json } => {
                assert_eq!(job_id, JobId(12));
                assert!(json);
            }
            _ => panic!("expected report command"),
        }
    }

    #[test]
    fn test_watch_requires_job_ids() {
        assert!(Cli::try_parse_from(["pipewatch", "watch"]).is_err());
    }
}
