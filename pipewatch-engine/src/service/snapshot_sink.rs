//! Snapshot sink service
//!
//! Applies fetched snapshots to the visible representation of a job. The
//! coordinator calls the sink once per successful tick, before it publishes
//! the status event.

use pipewatch_core::domain::job::{JobId, JobSnapshot};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

/// Service applying snapshots to a job's representation
///
/// Implementations must return promptly; the tick that produced the
/// snapshot waits for `apply_snapshot` to return.
pub trait SnapshotSink: Send + Sync {
    /// Applies one snapshot
    ///
    /// Overlapping ticks may deliver snapshots out of order; the last one
    /// applied wins.
    fn apply_snapshot(&self, snapshot: &JobSnapshot);
}

/// Keeps the latest snapshot per job in memory
///
/// Uses Arc<Mutex<HashMap>> so clones share the same view.
#[derive(Clone, Default)]
pub struct InMemorySnapshotSink {
    latest: Arc<Mutex<HashMap<JobId, JobSnapshot>>>,
    applied: Arc<AtomicUsize>,
}

impl InMemorySnapshotSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest snapshot applied for `job_id`
    pub fn latest(&self, job_id: JobId) -> Option<JobSnapshot> {
        let latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        latest.get(&job_id).cloned()
    }

    /// Total number of snapshots applied
    pub fn applied_count(&self) -> usize {
        self.applied.load(Ordering::SeqCst)
    }
}

impl SnapshotSink for InMemorySnapshotSink {
    fn apply_snapshot(&self, snapshot: &JobSnapshot) {
        let mut latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        latest.insert(snapshot.job_id, snapshot.clone());
        self.applied.fetch_add(1, Ordering::SeqCst);
    }
}

/// Logs every applied snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSnapshotSink;

impl SnapshotSink for TracingSnapshotSink {
    fn apply_snapshot(&self, snapshot: &JobSnapshot) {
        info!(
            "Job {} is {} (fetched {})",
            snapshot.job_id,
            snapshot.status,
            snapshot.fetched_at.format("%H:%M:%S")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipewatch_core::domain::status::{JobStatus, Stage};

    #[test]
    fn test_in_memory_sink_keeps_latest() {
        let sink = InMemorySnapshotSink::new();
        let job = JobId(7);

        sink.apply_snapshot(&JobSnapshot::new(
            job,
            JobStatus::Running(Stage::Research),
            serde_json::Value::Null,
        ));
        sink.apply_snapshot(&JobSnapshot::new(
            job,
            JobStatus::Complete(Stage::Research),
            serde_json::json!({ "companies": 12 }),
        ));

        let latest = sink.latest(job).unwrap();
        assert_eq!(latest.status, JobStatus::Complete(Stage::Research));
        assert_eq!(latest.payload["companies"], 12);
        assert_eq!(sink.applied_count(), 2);
        assert!(sink.latest(JobId(8)).is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let sink = InMemorySnapshotSink::new();
        let view = sink.clone();

        sink.apply_snapshot(&JobSnapshot::new(
            JobId(1),
            JobStatus::Pending,
            serde_json::Value::Null,
        ));

        assert_eq!(view.applied_count(), 1);
    }
}
