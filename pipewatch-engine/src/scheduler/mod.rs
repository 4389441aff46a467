//! Scheduler layer
//!
//! A registry of repeating tasks keyed by [`PollerKey`]. The scheduler owns
//! every timer it starts; callers only ever see keys and intervals. It has
//! no knowledge of jobs or statuses, that lives in the coordinator.

pub mod error_sink;
pub mod key;
pub mod registry;

pub use error_sink::{ErrorSink, TracingErrorSink};
pub use key::PollerKey;
pub use registry::PollScheduler;
