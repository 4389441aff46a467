//! Watch command handler
//!
//! Starts one watch per job and prints status changes until every job has
//! settled or the user interrupts.

use anyhow::Result;
use colored::*;
use pipewatch_core::domain::job::JobId;
use pipewatch_engine::repository::ClientStatusSource;
use pipewatch_engine::{Config, PipelineCoordinator, PollScheduler, WatchEvent};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::warn;

use super::job::client;
use crate::output::{ConsoleSink, colorize_status};

/// Why following the watch events ended
#[derive(Debug, PartialEq, Eq)]
enum WatchEnd {
    Settled,
    Interrupted,
    Closed,
}

/// Watch jobs until they settle
pub async fn watch_jobs(config: &Config, job_ids: Vec<JobId>) -> Result<()> {
    let client = Arc::new(client(config)?);
    let scheduler = Arc::new(PollScheduler::new(config.poll_interval));
    let coordinator = PipelineCoordinator::with_event_capacity(
        scheduler,
        Arc::new(ClientStatusSource::new(client)),
        Arc::new(ConsoleSink::new()),
        config.event_capacity,
    );

    let mut events = coordinator.subscribe();
    for job_id in &job_ids {
        coordinator.start_watch(*job_id);
    }

    println!(
        "{}",
        format!(
            "Watching {} job(s) every {:?} (Ctrl-C to stop)",
            job_ids.len(),
            config.poll_interval
        )
        .bold()
    );

    let end = follow_events(
        &mut events,
        || coordinator.watched_jobs().is_empty(),
        tokio::signal::ctrl_c(),
    )
    .await;

    if end == WatchEnd::Interrupted {
        let stopped = coordinator.stop_all_watches();
        println!();
        println!("{}", format!("Stopped {} watch(es)", stopped).yellow());
    }

    Ok(())
}

/// Prints watch events until `all_settled` holds or `shutdown` completes
///
/// `all_settled` is checked after every settle and after every lag, since
/// the skipped events may include the last settle.
async fn follow_events<S>(
    events: &mut broadcast::Receiver<WatchEvent>,
    all_settled: impl Fn() -> bool,
    shutdown: S,
) -> WatchEnd
where
    S: Future,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    let job_id = event.job_id();
                    match event {
                        WatchEvent::StageSettled { status, .. } => {
                            println!(
                                "{} Job {} settled at {}",
                                "✓".green(),
                                job_id.to_string().bold(),
                                colorize_status(&status)
                            );
                            if all_settled() {
                                return WatchEnd::Settled;
                            }
                        }
                        WatchEvent::FetchFailed { message, .. } => {
                            eprintln!(
                                "{}",
                                format!(
                                    "Job {}: status fetch failed, retrying ({})",
                                    job_id, message
                                )
                                .dimmed()
                            );
                        }
                        WatchEvent::StatusObserved { .. } => {}
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Watch output fell behind, skipped {} event(s)", skipped);
                    if all_settled() {
                        return WatchEnd::Settled;
                    }
                }
                Err(RecvError::Closed) => return WatchEnd::Closed,
            },
            _ = &mut shutdown => return WatchEnd::Interrupted,
        }
    }
}
