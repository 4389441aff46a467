//! Error sinks for failed poll ticks
//!
//! A failed tick never stops its poller. The failure is handed to an
//! [`ErrorSink`] and the next tick runs on schedule.

use tracing::error;

use super::key::PollerKey;

/// Receives failures raised by poll actions
pub trait ErrorSink: Send + Sync {
    /// Reports one failed tick
    fn report(&self, key: &PollerKey, error: &anyhow::Error);
}

/// Default sink: logs every failure at error level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn report(&self, key: &PollerKey, error: &anyhow::Error) {
        error!("Poll tick for {} failed: {:#}", key, error);
    }
}

impl<F> ErrorSink for F
where
    F: Fn(&PollerKey, &anyhow::Error) + Send + Sync,
{
    fn report(&self, key: &PollerKey, error: &anyhow::Error) {
        self(key, error)
    }
}
