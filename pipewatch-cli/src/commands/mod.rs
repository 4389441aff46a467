//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod job;
mod watch;

use anyhow::Result;
use clap::Subcommand;
use pipewatch_core::domain::job::JobId;
use pipewatch_core::domain::status::Stage;

use pipewatch_engine::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List all jobs
    List,
    /// Show the current status of a job
    Status {
        /// Job ID
        job_id: JobId,
    },
    /// Watch jobs until every one of them settles
    Watch {
        /// Job IDs
        #[arg(required = true)]
        job_ids: Vec<JobId>,
    },
    /// Start (or retry) a stage, then watch it until it settles
    Start {
        /// Job ID
        job_id: JobId,
        /// Stage to start: research, legal_resolution or data_extraction
        stage: Stage,
    },
    /// Print the insurance cost report a job produced
    Report {
        /// Job ID
        job_id: JobId,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The resolved configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::List => job::list_jobs(config).await,
        Commands::Status { job_id } => job::show_status(config, job_id).await,
        Commands::Watch { job_ids } => watch::watch_jobs(config, job_ids).await,
        Commands::Start { job_id, stage } => job::start_stage(config, job_id, stage).await,
        Commands::Report { job_id, json } => job::show_report(config, job_id, json).await,
    }
}
