//! Status repository
//!
//! The remote status source: given a job id, returns the job's current
//! snapshot or fails. No retry happens here; the next scheduled tick is the
//! retry.

use anyhow::{Context, Result};
use async_trait::async_trait;
use pipewatch_client::PipelineClient;
use pipewatch_core::domain::job::{JobId, JobSnapshot};
use std::sync::Arc;

/// Source of job status snapshots
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetches the current snapshot of a job
    ///
    /// # Arguments
    /// * `job_id` - The job to fetch
    async fn fetch_status(&self, job_id: JobId) -> Result<JobSnapshot>;
}

/// [`StatusSource`] backed by the pipeline API client
#[derive(Debug, Clone)]
pub struct ClientStatusSource {
    client: Arc<PipelineClient>,
}

impl ClientStatusSource {
    pub fn new(client: Arc<PipelineClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StatusSource for ClientStatusSource {
    async fn fetch_status(&self, job_id: JobId) -> Result<JobSnapshot> {
        self.client
            .get_job_status(job_id)
            .await
            .with_context(|| format!("Failed to fetch status for job {}", job_id))
    }
}
