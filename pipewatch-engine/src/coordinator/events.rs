//! Watch events
//!
//! Published by the coordinator on a broadcast channel. Subscribers that
//! fall behind by more than the channel capacity lose the oldest events;
//! only the latest status matters, so a lagging reader can resync from
//! [`PipelineCoordinator::last_status`](super::PipelineCoordinator::last_status).

use pipewatch_core::domain::job::{JobId, JobSnapshot};
use pipewatch_core::domain::status::JobStatus;

#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// A tick fetched a snapshot. Fires after every successful tick.
    StatusObserved {
        job_id: JobId,
        /// Status seen by the previous successful tick, if any
        previous: Option<JobStatus>,
        status: JobStatus,
        snapshot: JobSnapshot,
    },
    /// The watch stopped because the observed status is final
    StageSettled { job_id: JobId, status: JobStatus },
    /// A tick failed to fetch; watching continues
    FetchFailed { job_id: JobId, message: String },
}

impl WatchEvent {
    pub fn job_id(&self) -> JobId {
        match self {
            WatchEvent::StatusObserved { job_id, .. }
            | WatchEvent::StageSettled { job_id, .. }
            | WatchEvent::FetchFailed { job_id, .. } => *job_id,
        }
    }

    /// True for a status observation that differs from the one before it
    pub fn is_transition(&self) -> bool {
        match self {
            WatchEvent::StatusObserved {
                previous, status, ..
            } => previous.as_ref() != Some(status),
            _ => false,
        }
    }
}
