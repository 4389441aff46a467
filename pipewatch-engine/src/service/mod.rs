//! Service layer
//!
//! Services that consume what the coordinator observes. The snapshot sink
//! is the seam between polling and whatever renders a job's state.

mod snapshot_sink;

// Re-export traits
pub use snapshot_sink::SnapshotSink;

// Re-export implementations
pub use snapshot_sink::{InMemorySnapshotSink, TracingSnapshotSink};
