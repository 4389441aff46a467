//! Job DTOs for the remote pipeline API

use serde::{Deserialize, Serialize};

use crate::domain::job::{JobId, JobSnapshot};
use crate::domain::status::JobStatus;

/// Body returned by the job status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusResponse {
    pub id: JobId,
    pub status: JobStatus,
    #[serde(default)]
    pub details: serde_json::Value,
}

impl From<JobStatusResponse> for JobSnapshot {
    fn from(response: JobStatusResponse) -> Self {
        JobSnapshot::new(response.id, response.status, response.details)
    }
}

/// Request to start (or retry) a stage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartStageRequest {
    /// Free-form parameters forwarded to the stage
    #[serde(default)]
    pub parameters: std::collections::HashMap<String, serde_json::Value>,
}
