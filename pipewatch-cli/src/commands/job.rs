//! Job command handlers
//!
//! One-shot calls against the pipeline API: listing, status, starting a
//! stage and fetching reports.

use anyhow::{Context, Result};
use colored::*;
use pipewatch_client::{ClientError, PipelineClient};
use pipewatch_core::classifier;
use pipewatch_core::domain::job::JobId;
use pipewatch_core::domain::report::FirmReport;
use pipewatch_core::domain::status::Stage;
use pipewatch_core::dto::job::StartStageRequest;
use pipewatch_engine::Config;

use super::watch::watch_jobs;
use crate::output::{colorize_status, print_firm_report, print_job_summary, print_snapshot};

/// Builds an API client honoring the configured request timeout
pub fn client(config: &Config) -> Result<PipelineClient> {
    PipelineClient::with_timeout(&config.api_url, config.request_timeout)
        .context("Failed to build HTTP client")
}

/// Turns a failed API call about `job_id` into a user-facing error
fn job_error(job_id: JobId, what: &str, err: ClientError) -> anyhow::Error {
    if err.is_not_found() {
        anyhow::anyhow!("Job {} has no {} (not found)", job_id, what)
    } else {
        anyhow::Error::new(err).context(format!("Failed to fetch {} for job {}", what, job_id))
    }
}

/// List all jobs
pub async fn list_jobs(config: &Config) -> Result<()> {
    let jobs = client(config)?.list_jobs().await?;

    if jobs.is_empty() {
        println!("{}", "No jobs found.".yellow());
    } else {
        println!("{}", format!("Found {} job(s):", jobs.len()).bold());
        println!();
        for job in jobs {
            print_job_summary(&job);
        }
    }

    Ok(())
}

/// Fetch and display the current status of a job
pub async fn show_status(config: &Config, job_id: JobId) -> Result<()> {
    let snapshot = client(config)?
        .get_job_status(job_id)
        .await
        .map_err(|e| job_error(job_id, "status", e))?;

    print_snapshot(&snapshot);

    Ok(())
}

/// Start a stage, then watch it until it settles
///
/// The stage must be startable from the job's current status: the first
/// stage from pending, the next stage after a completed one, or the same
/// stage after a failure.
pub async fn start_stage(config: &Config, job_id: JobId, stage: Stage) -> Result<()> {
    let client = client(config)?;

    let current = client
        .get_job_status(job_id)
        .await
        .map_err(|e| job_error(job_id, "status", e))?;

    if current.status.startable_stage() != Some(stage) {
        anyhow::bail!(
            "Stage {} cannot be started while job {} is {}",
            stage,
            job_id,
            current.status
        );
    }

    let verb = if current.status.is_failed() {
        "Retrying"
    } else {
        "Starting"
    };
    println!("{} {} for job {}", verb, stage.to_string().bold(), job_id);

    let snapshot = client
        .start_stage(job_id, stage, StartStageRequest::default())
        .await
        .with_context(|| format!("Failed to start stage {} for job {}", stage, job_id))?;

    if !classifier::requires_polling(&snapshot.status) {
        println!(
            "Job {} is {} right after the start, nothing to watch",
            job_id,
            colorize_status(&snapshot.status)
        );
        return Ok(());
    }

    watch_jobs(config, vec![job_id]).await
}

/// Fetch a job's research results and print them as a cost report
pub async fn show_report(config: &Config, job_id: JobId, json: bool) -> Result<()> {
    let results = client(config)?
        .get_report(job_id)
        .await
        .map_err(|e| job_error(job_id, "report", e))?;

    let firm_name = results
        .firm_name
        .clone()
        .unwrap_or_else(|| format!("Job {}", job_id));
    let report = FirmReport::from_results(firm_name, &results);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_firm_report(&report);
    }

    Ok(())
}
