//! Job status domain types
//!
//! A job walks through a fixed sequence of stages. Each stage is started
//! explicitly, runs on the server, and then settles as complete or failed.
//! The wire representation is a single snake_case string such as
//! `research_running` or `legal_resolution_failed`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A stage of the job pipeline, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Research,
    LegalResolution,
    DataExtraction,
}

impl Stage {
    /// Every stage in execution order
    pub const ALL: [Stage; 3] = [Stage::Research, Stage::LegalResolution, Stage::DataExtraction];

    /// Wire prefix for this stage
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Research => "research",
            Stage::LegalResolution => "legal_resolution",
            Stage::DataExtraction => "data_extraction",
        }
    }

    /// The stage that follows this one, if any
    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::Research => Some(Stage::LegalResolution),
            Stage::LegalResolution => Some(Stage::DataExtraction),
            Stage::DataExtraction => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| format!("unknown stage: {}", s))
    }
}

/// Last observed status of a job
///
/// Values outside the known set are kept verbatim in [`JobStatus::Unknown`]
/// so they survive deserialization and can be classified fail-safe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    /// The job exists but no stage has been started yet
    Pending,
    /// A stage is being worked on server-side
    Running(Stage),
    /// A stage finished; the next one needs an explicit start
    Complete(Stage),
    /// A stage failed; it needs an explicit retry
    Failed(Stage),
    /// A status value this client does not recognize
    Unknown(String),
}

impl JobStatus {
    /// The stage this status refers to, if any
    pub fn stage(&self) -> Option<Stage> {
        match self {
            JobStatus::Running(stage) | JobStatus::Complete(stage) | JobStatus::Failed(stage) => {
                Some(*stage)
            }
            JobStatus::Pending | JobStatus::Unknown(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, JobStatus::Failed(_))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, JobStatus::Unknown(_))
    }

    /// The stage a user can start from this status
    ///
    /// Pending starts the first stage, a failed stage can be retried, and a
    /// completed stage unlocks the following one.
    pub fn startable_stage(&self) -> Option<Stage> {
        match self {
            JobStatus::Pending => Some(Stage::Research),
            JobStatus::Failed(stage) => Some(*stage),
            JobStatus::Complete(stage) => stage.next(),
            JobStatus::Running(_) | JobStatus::Unknown(_) => None,
        }
    }

    /// Parses a wire status string, falling back to [`JobStatus::Unknown`]
    pub fn parse(value: &str) -> Self {
        if value == "pending" {
            return JobStatus::Pending;
        }

        for stage in Stage::ALL {
            if let Some(suffix) = value
                .strip_prefix(stage.as_str())
                .and_then(|rest| rest.strip_prefix('_'))
            {
                match suffix {
                    "running" => return JobStatus::Running(stage),
                    "complete" => return JobStatus::Complete(stage),
                    "failed" => return JobStatus::Failed(stage),
                    _ => {}
                }
            }
        }

        JobStatus::Unknown(value.to_string())
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Pending => f.write_str("pending"),
            JobStatus::Running(stage) => write!(f, "{}_running", stage),
            JobStatus::Complete(stage) => write!(f, "{}_complete", stage),
            JobStatus::Failed(stage) => write!(f, "{}_failed", stage),
            JobStatus::Unknown(raw) => f.write_str(raw),
        }
    }
}

impl From<String> for JobStatus {
    fn from(value: String) -> Self {
        JobStatus::parse(&value)
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.to_string()
    }
}
