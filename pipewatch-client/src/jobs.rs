//! Job-related API endpoints

use crate::PipelineClient;
use crate::error::Result;
use pipewatch_core::domain::job::{Job, JobId, JobSnapshot};
use pipewatch_core::domain::status::Stage;
use pipewatch_core::dto::job::{JobStatusResponse, StartStageRequest};
use tracing::debug;

impl PipelineClient {
    // =============================================================================
    // Job Status
    // =============================================================================

    /// Fetch the current status of a job
    ///
    /// # Arguments
    /// * `job_id` - The job identifier
    ///
    /// # Returns
    /// A snapshot stamped with the time it was received
    pub async fn get_job_status(&self, job_id: JobId) -> Result<JobSnapshot> {
        let url = format!("{}/api/jobs/{}/status", self.base_url, job_id);
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;

        let body: JobStatusResponse = self.handle_response(response).await?;
        Ok(body.into())
    }

    /// List all jobs
    pub async fn list_jobs(&self) -> Result<Vec<Job>> {
        let url = format!("{}/api/jobs", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Stage Lifecycle
    // =============================================================================

    /// Start a stage of a job
    ///
    /// Also used to retry a failed stage. The server answers with the job's
    /// status right after the start was accepted.
    ///
    /// # Arguments
    /// * `job_id` - The job identifier
    /// * `stage` - The stage to start
    /// * `req` - Stage parameters
    pub async fn start_stage(
        &self,
        job_id: JobId,
        stage: Stage,
        req: StartStageRequest,
    ) -> Result<JobSnapshot> {
        let url = format!(
            "{}/api/jobs/{}/stages/{}/start",
            self.base_url, job_id, stage
        );
        debug!("POST {}", url);
        let response = self.client.post(&url).json(&req).send().await?;

        let body: JobStatusResponse = self.handle_response(response).await?;
        Ok(body.into())
    }
}
