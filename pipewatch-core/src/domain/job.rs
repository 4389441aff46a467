//! Job domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::status::JobStatus;

/// Identifier of a server-tracked job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JobId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(JobId)
    }
}

impl From<u64> for JobId {
    fn from(value: u64) -> Self {
        JobId(value)
    }
}

/// Result of one status fetch
///
/// Immutable once produced; the next fetch supersedes it rather than
/// mutating it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub job_id: JobId,
    pub status: JobStatus,
    /// Domain data attached to the status (progress counters, stage notes)
    #[serde(default)]
    pub payload: serde_json::Value,
    pub fetched_at: DateTime<Utc>,
}

impl JobSnapshot {
    /// Creates a snapshot stamped with the current time
    pub fn new(job_id: JobId, status: JobStatus, payload: serde_json::Value) -> Self {
        Self {
            job_id,
            status,
            payload,
            fetched_at: Utc::now(),
        }
    }
}

/// Lightweight job summary for listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub name: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
