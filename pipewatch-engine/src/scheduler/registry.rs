//! Poll scheduler
//!
//! Runs one repeating action per key. Each key gets a tick loop task driven
//! by `tokio::time::interval`; every tick spawns the action as its own task,
//! so a slow action never delays the next tick boundary and ticks of the
//! same key may overlap.
//!
//! Stopping a key aborts its tick loop. Actions already in flight are not
//! aborted and run to completion.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::error_sink::{ErrorSink, TracingErrorSink};
use super::key::PollerKey;
use crate::error::WatchError;

/// Shortest interval a poller may run at
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Registry record for one running poller
///
/// Dropping the entry cancels its tick loop.
struct PollerEntry {
    interval: Duration,
    started_at: DateTime<Utc>,
    ticks: Arc<AtomicU64>,
    handle: JoinHandle<()>,
}

impl Drop for PollerEntry {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Repeating-task registry with one poller per key
///
/// The registry lock is never held while an action runs, so actions may
/// call back into the scheduler (including stopping their own key).
///
/// All `start_*` methods spawn onto the current Tokio runtime and must be
/// called from within one.
pub struct PollScheduler {
    entries: Mutex<HashMap<PollerKey, PollerEntry>>,
    default_interval: Duration,
    error_sink: Arc<dyn ErrorSink>,
}

impl PollScheduler {
    /// Creates a scheduler that logs failed ticks through `tracing`
    pub fn new(default_interval: Duration) -> Self {
        Self::with_error_sink(default_interval, Arc::new(TracingErrorSink))
    }

    /// Creates a scheduler reporting failed ticks to `error_sink`
    pub fn with_error_sink(default_interval: Duration, error_sink: Arc<dyn ErrorSink>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            default_interval: default_interval.max(MIN_INTERVAL),
            error_sink,
        }
    }

    /// Interval used by [`PollScheduler::start_polling`]
    pub fn default_interval(&self) -> Duration {
        self.default_interval
    }

    /// Starts polling `key` at the default interval
    ///
    /// See [`PollScheduler::start_polling_every`].
    pub fn start_polling<F, Fut>(&self, key: PollerKey, action: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.start_polling_every(key, action, self.default_interval);
    }

    /// Starts polling `key`, running `action` now and then every `interval`
    ///
    /// An existing poller for `key` is stopped first, so restarting a key
    /// replaces its timer instead of adding a second one.
    pub fn start_polling_every<F, Fut>(&self, key: PollerKey, action: F, interval: Duration)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let interval = if interval < MIN_INTERVAL {
            warn!(
                "Interval {:?} for poller {} is too short, using {:?}",
                interval, key, MIN_INTERVAL
            );
            MIN_INTERVAL
        } else {
            interval
        };

        let mut entries = self.lock_entries();

        if let Some(previous) = entries.remove(&key) {
            debug!(
                "Replacing poller {} (ran {} tick(s))",
                key,
                previous.ticks.load(Ordering::Relaxed)
            );
        }

        let ticks = Arc::new(AtomicU64::new(0));
        let handle = spawn_tick_loop(
            key.clone(),
            Arc::new(action),
            interval,
            Arc::clone(&self.error_sink),
            Arc::clone(&ticks),
        );

        entries.insert(
            key.clone(),
            PollerEntry {
                interval,
                started_at: Utc::now(),
                ticks,
                handle,
            },
        );

        info!("Started poller {} (interval: {:?})", key, interval);
    }

    /// Stops polling `key`
    ///
    /// Returns `false` if no poller was registered for `key`.
    pub fn stop_polling(&self, key: &PollerKey) -> bool {
        let removed = self.lock_entries().remove(key);

        match removed {
            Some(entry) => {
                info!(
                    "Stopped poller {} after {} tick(s), running since {}",
                    key,
                    entry.ticks.load(Ordering::Relaxed),
                    entry.started_at.format("%H:%M:%S")
                );
                true
            }
            None => {
                debug!("Poller {} is not running, nothing to stop", key);
                false
            }
        }
    }

    /// Stops every poller, returning how many were running
    pub fn stop_all(&self) -> usize {
        let drained: Vec<_> = self.lock_entries().drain().collect();
        let count = drained.len();
        drop(drained);

        if count > 0 {
            info!("Stopped {} poller(s)", count);
        }
        count
    }

    /// Stops every poller whose key belongs to `namespace`
    pub fn stop_namespace(&self, namespace: &str) -> usize {
        let removed: Vec<_> = {
            let mut entries = self.lock_entries();
            let keys: Vec<PollerKey> = entries
                .keys()
                .filter(|key| key.strip_namespace(namespace).is_some())
                .cloned()
                .collect();
            keys.into_iter()
                .filter_map(|key| entries.remove(&key))
                .collect()
        };
        let count = removed.len();
        drop(removed);

        if count > 0 {
            info!("Stopped {} poller(s) in namespace '{}'", count, namespace);
        }
        count
    }

    pub fn is_polling(&self, key: &PollerKey) -> bool {
        self.lock_entries().contains_key(key)
    }

    /// Snapshot of running pollers and their intervals
    pub fn active_pollers(&self) -> BTreeMap<PollerKey, Duration> {
        self.lock_entries()
            .iter()
            .map(|(key, entry)| (key.clone(), entry.interval))
            .collect()
    }

    /// Keys of running pollers, sorted
    pub fn active_keys(&self) -> Vec<PollerKey> {
        let mut keys: Vec<_> = self.lock_entries().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn lock_entries(&self) -> MutexGuard<'_, HashMap<PollerKey, PollerEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Spawns the tick loop for one key
///
/// Each tick runs the action in its own task; a supervising task awaits it
/// and reports errors and panics to the error sink.
fn spawn_tick_loop<F, Fut>(
    key: PollerKey,
    action: Arc<F>,
    interval: Duration,
    error_sink: Arc<dyn ErrorSink>,
    ticks: Arc<AtomicU64>,
) -> JoinHandle<()>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let tick = ticks.fetch_add(1, Ordering::Relaxed) + 1;
            debug!("Poller {} tick {}", key, tick);

            let action = Arc::clone(&action);
            let key = key.clone();
            let error_sink = Arc::clone(&error_sink);

            tokio::spawn(async move {
                let run = tokio::spawn(async move { action().await });

                match run.await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => error_sink.report(&key, &e),
                    Err(join_error) if join_error.is_panic() => {
                        let e = anyhow::Error::new(WatchError::ActionPanicked { key: key.clone() });
                        error_sink.report(&key, &e);
                    }
                    Err(_) => debug!("Tick for poller {} was cancelled", key),
                }
            });
        }
    })
}
