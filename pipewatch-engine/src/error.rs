//! Engine error types

use pipewatch_core::domain::job::JobId;
use thiserror::Error;

use crate::scheduler::PollerKey;

/// Failures raised while watching jobs
///
/// None of these stop a watcher. They are reported through the scheduler's
/// error sink and the next tick runs on schedule.
#[derive(Debug, Error)]
pub enum WatchError {
    /// A single status fetch failed (network error, bad response, bad payload)
    #[error("failed to fetch status for job {job_id}: {message}")]
    FetchFailed { job_id: JobId, message: String },

    /// A poll action panicked
    #[error("poll action for {key} panicked")]
    ActionPanicked { key: PollerKey },
}
