//! Coordinator layer
//!
//! Turns job statuses into start/stop decisions for the scheduler and
//! publishes what each tick observed.

pub mod events;
pub mod pipeline;

pub use events::WatchEvent;
pub use pipeline::{PIPELINE_NAMESPACE, PipelineCoordinator};
