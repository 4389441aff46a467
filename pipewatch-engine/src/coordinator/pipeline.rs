//! Pipeline coordinator
//!
//! Watches jobs by polling their status. Per job the coordinator is either
//! unwatched or watching:
//!
//! - `start_watch` moves a job to watching (or replaces its timer if it is
//!   already watched). The caller is expected to believe the job is running;
//!   the first tick's fetch is authoritative either way.
//! - Every tick fetches a snapshot, hands it to the snapshot sink, records
//!   it and publishes [`WatchEvent::StatusObserved`].
//! - A final status stops the job's poller from inside the tick and
//!   publishes [`WatchEvent::StageSettled`].
//! - A failed fetch changes nothing; it is published and reported, and the
//!   next tick tries again.
//!
//! Every `start_watch` opens a new generation for the job. A tick belongs to
//! the generation that spawned it, and only a tick of the current, still
//! polling generation may record a status or stop the poller. Ticks left in
//! flight by a replaced or stopped watch still reach the snapshot sink.

use anyhow::Result;
use pipewatch_core::classifier;
use pipewatch_core::domain::job::{JobId, JobSnapshot};
use pipewatch_core::domain::status::JobStatus;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::broadcast;
use tokio::time::Duration;
use tracing::{debug, info, warn};

use super::events::WatchEvent;
use crate::error::WatchError;
use crate::repository::StatusSource;
use crate::scheduler::{PollScheduler, PollerKey};
use crate::service::SnapshotSink;

/// Key namespace owned by the coordinator
pub const PIPELINE_NAMESPACE: &str = "pipeline";

/// Default capacity of the event channel
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Per-job watch state
#[derive(Debug)]
struct WatchRecord {
    generation: u64,
    polling: bool,
    status: Option<JobStatus>,
}

#[derive(Debug, Default)]
struct WatchTable {
    next_generation: u64,
    jobs: HashMap<JobId, WatchRecord>,
}

type SharedTable = Arc<Mutex<WatchTable>>;

/// Drives one poller per watched job
pub struct PipelineCoordinator {
    scheduler: Arc<PollScheduler>,
    source: Arc<dyn StatusSource>,
    sink: Arc<dyn SnapshotSink>,
    events: broadcast::Sender<WatchEvent>,
    table: SharedTable,
}

impl PipelineCoordinator {
    /// Creates a coordinator on top of a (possibly shared) scheduler
    pub fn new(
        scheduler: Arc<PollScheduler>,
        source: Arc<dyn StatusSource>,
        sink: Arc<dyn SnapshotSink>,
    ) -> Self {
        Self::with_event_capacity(scheduler, source, sink, DEFAULT_EVENT_CAPACITY)
    }

    /// Creates a coordinator whose event channel buffers `capacity` events
    pub fn with_event_capacity(
        scheduler: Arc<PollScheduler>,
        source: Arc<dyn StatusSource>,
        sink: Arc<dyn SnapshotSink>,
        capacity: usize,
    ) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        Self {
            scheduler,
            source,
            sink,
            events,
            table: Arc::new(Mutex::new(WatchTable::default())),
        }
    }

    /// Poller key for a job: `pipeline-{job_id}`
    pub fn key_for(job_id: JobId) -> PollerKey {
        PollerKey::namespaced(PIPELINE_NAMESPACE, job_id)
    }

    /// Subscribes to watch events
    ///
    /// Only events published after this call are received.
    pub fn subscribe(&self) -> broadcast::Receiver<WatchEvent> {
        self.events.subscribe()
    }

    /// Starts watching a job at the scheduler's default interval
    pub fn start_watch(&self, job_id: JobId) {
        self.start_watch_every(job_id, self.scheduler.default_interval());
    }

    /// Starts watching a job, polling every `interval`
    ///
    /// Calling this for a job that is already watched replaces its timer.
    /// The last recorded status is kept, so the first tick of the new watch
    /// still reports it as `previous`.
    pub fn start_watch_every(&self, job_id: JobId, interval: Duration) {
        let key = Self::key_for(job_id);

        // Held across the registration so a tick of the old generation
        // cannot stop the new poller between the bump and the insert
        let mut table = lock_table(&self.table);
        table.next_generation += 1;
        let generation = table.next_generation;

        let record = table.jobs.entry(job_id).or_insert(WatchRecord {
            generation,
            polling: false,
            status: None,
        });
        if record.polling {
            debug!("Job {} is already watched, restarting its poller", job_id);
        }
        record.generation = generation;
        record.polling = true;

        let tick = Tick {
            job_id,
            generation,
            key: key.clone(),
            scheduler: Arc::downgrade(&self.scheduler),
            source: Arc::clone(&self.source),
            sink: Arc::clone(&self.sink),
            events: self.events.clone(),
            table: Arc::clone(&self.table),
        };

        self.scheduler.start_polling_every(
            key,
            move || {
                let tick = tick.clone();
                async move { tick.run().await }
            },
            interval,
        );
        info!("Watching job {} every {:?}", job_id, interval);
    }

    /// Stops watching a job and forgets its last status
    ///
    /// Returns `false` if the job was not watched.
    pub fn stop_watch(&self, job_id: JobId) -> bool {
        let mut table = lock_table(&self.table);
        table.jobs.remove(&job_id);
        let stopped = self.scheduler.stop_polling(&Self::key_for(job_id));
        drop(table);

        if stopped {
            info!("Stopped watching job {}", job_id);
        }
        stopped
    }

    /// Stops every watch owned by this coordinator and forgets all statuses
    ///
    /// Pollers registered on the same scheduler under other namespaces keep
    /// running.
    pub fn stop_all_watches(&self) -> usize {
        let mut table = lock_table(&self.table);
        table.jobs.clear();
        self.scheduler.stop_namespace(PIPELINE_NAMESPACE)
    }

    pub fn is_watching(&self, job_id: JobId) -> bool {
        self.scheduler.is_polling(&Self::key_for(job_id))
    }

    /// Jobs currently watched, in ascending order
    pub fn watched_jobs(&self) -> Vec<JobId> {
        let mut jobs: Vec<JobId> = self
            .scheduler
            .active_keys()
            .iter()
            .filter_map(|key| key.strip_namespace(PIPELINE_NAMESPACE))
            .filter_map(|id| id.parse().ok())
            .collect();
        jobs.sort();
        jobs
    }

    /// Status recorded by the current watch of `job_id`
    ///
    /// A settled job keeps its final status here until `stop_watch` or
    /// `stop_all_watches` forgets it. Ticks of a stopped or replaced watch
    /// never write here.
    pub fn last_status(&self, job_id: JobId) -> Option<JobStatus> {
        lock_table(&self.table)
            .jobs
            .get(&job_id)
            .and_then(|record| record.status.clone())
    }
}

fn lock_table(table: &SharedTable) -> MutexGuard<'_, WatchTable> {
    table.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Everything one tick of a job's poller needs
///
/// Holds the scheduler weakly so a registered poller never keeps its own
/// scheduler alive.
#[derive(Clone)]
struct Tick {
    job_id: JobId,
    generation: u64,
    key: PollerKey,
    scheduler: Weak<PollScheduler>,
    source: Arc<dyn StatusSource>,
    sink: Arc<dyn SnapshotSink>,
    events: broadcast::Sender<WatchEvent>,
    table: SharedTable,
}

impl Tick {
    async fn run(self) -> Result<()> {
        debug!("Fetching status for job {}", self.job_id);

        let snapshot = match self.source.fetch_status(self.job_id).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                let message = format!("{:#}", e);
                self.publish(WatchEvent::FetchFailed {
                    job_id: self.job_id,
                    message: message.clone(),
                });
                return Err(WatchError::FetchFailed {
                    job_id: self.job_id,
                    message,
                }
                .into());
            }
        };

        self.apply(snapshot);
        Ok(())
    }

    fn apply(&self, snapshot: JobSnapshot) {
        if snapshot.job_id != self.job_id {
            warn!(
                "Status source answered job {} with a snapshot for job {}",
                self.job_id, snapshot.job_id
            );
        }

        self.sink.apply_snapshot(&snapshot);

        let status = snapshot.status.clone();
        let settled = classifier::is_final_for_polling(&status);
        let (current, previous) = self.record(&status, settled);

        if current {
            match &previous {
                Some(prev) if *prev != status => {
                    info!("Job {} moved from {} to {}", self.job_id, prev, status)
                }
                None => info!("Job {} is {}", self.job_id, status),
                _ => debug!("Job {} still {}", self.job_id, status),
            }
        } else {
            debug!(
                "Job {} answered {} to a tick of a replaced or stopped watch",
                self.job_id, status
            );
        }

        self.publish(WatchEvent::StatusObserved {
            job_id: self.job_id,
            previous,
            status: status.clone(),
            snapshot,
        });

        if current && settled {
            info!("Job {} settled at {}", self.job_id, status);
            self.publish(WatchEvent::StageSettled {
                job_id: self.job_id,
                status,
            });
        }
    }

    /// Records `status` if this tick belongs to the job's current watch
    ///
    /// Returns whether it did, and the status recorded before. A settled
    /// status also stops the poller, under the same lock that guards
    /// `start_watch_every`, so a newer watch is never the one stopped.
    fn record(&self, status: &JobStatus, settled: bool) -> (bool, Option<JobStatus>) {
        let mut table = lock_table(&self.table);
        let Some(record) = table.jobs.get_mut(&self.job_id) else {
            return (false, None);
        };

        if !record.polling || record.generation != self.generation {
            return (false, record.status.clone());
        }

        let previous = record.status.replace(status.clone());
        if settled {
            record.polling = false;
            if let Some(scheduler) = self.scheduler.upgrade() {
                scheduler.stop_polling(&self.key);
            }
        }
        (true, previous)
    }

    fn publish(&self, event: WatchEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}
