//! Report endpoints

use crate::PipelineClient;
use crate::error::Result;
use pipewatch_core::domain::job::JobId;
use pipewatch_core::dto::report::ResearchResults;
use tracing::debug;

impl PipelineClient {
    /// Fetch the research results a job produced
    ///
    /// Turn them into a report with
    /// [`FirmReport::from_results`](pipewatch_core::domain::report::FirmReport::from_results).
    pub async fn get_report(&self, job_id: JobId) -> Result<ResearchResults> {
        let url = format!("{}/api/jobs/{}/report", self.base_url, job_id);
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
