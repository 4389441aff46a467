//! Pipewatch Engine
//!
//! Polling orchestration for server-side, multi-stage jobs. The client has
//! no push channel, so it learns about progress by asking, once per tick,
//! for every job it watches.
//!
//! Architecture:
//! - Configuration: polling interval and API settings from environment or defaults
//! - Scheduler: one repeating task per key, with replace-on-restart and stop-from-within-tick
//! - Repositories: the remote status source (HTTP or test double)
//! - Services: the snapshot sink that renders what was fetched
//! - Coordinator: starts a watch per job and stops it once the job's stage settles
//!
//! # Example
//!
//! ```no_run
//! use pipewatch_client::PipelineClient;
//! use pipewatch_core::domain::job::JobId;
//! use pipewatch_engine::coordinator::{PipelineCoordinator, WatchEvent};
//! use pipewatch_engine::repository::ClientStatusSource;
//! use pipewatch_engine::scheduler::PollScheduler;
//! use pipewatch_engine::service::TracingSnapshotSink;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = Arc::new(PipelineClient::new("http://localhost:8000"));
//!     let scheduler = Arc::new(PollScheduler::new(Duration::from_secs(3)));
//!     let coordinator = PipelineCoordinator::new(
//!         scheduler,
//!         Arc::new(ClientStatusSource::new(client)),
//!         Arc::new(TracingSnapshotSink),
//!     );
//!
//!     let mut events = coordinator.subscribe();
//!     coordinator.start_watch(JobId(42));
//!
//!     while let Ok(event) = events.recv().await {
//!         if let WatchEvent::StageSettled { job_id, status } = event {
//!             println!("Job {} settled at {}", job_id, status);
//!             break;
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod coordinator;
pub mod error;
pub mod repository;
pub mod scheduler;
pub mod service;

pub use config::Config;
pub use coordinator::{PipelineCoordinator, WatchEvent};
pub use error::WatchError;
pub use scheduler::{PollScheduler, PollerKey};
