//! Pipewatch HTTP Client
//!
//! A small, typed HTTP client for the remote pipeline API.
//!
//! The client only performs one-shot calls: fetch a job's current status,
//! start a stage, fetch a report. Repeated polling lives in
//! `pipewatch-engine`, which uses this client as its status source.
//!
//! # Example
//!
//! ```no_run
//! use pipewatch_client::PipelineClient;
//! use pipewatch_core::domain::job::JobId;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PipelineClient::new("http://localhost:8000");
//!
//!     let snapshot = client.get_job_status(JobId(42)).await?;
//!     println!("Job 42 is {}", snapshot.status);
//!     Ok(())
//! }
//! ```

pub mod error;
mod jobs;
mod reports;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client for the pipeline API
///
/// Methods are grouped by concern:
/// - Job status and listing
/// - Stage lifecycle (start / retry)
/// - Reports
#[derive(Debug, Clone)]
pub struct PipelineClient {
    /// Base URL of the API (e.g., "http://localhost:8000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl PipelineClient {
    /// Create a new pipeline client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the pipeline API (e.g., "http://localhost:8000")
    ///
    /// # Example
    /// ```
    /// use pipewatch_client::PipelineClient;
    ///
    /// let client = PipelineClient::new("http://localhost:8000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new pipeline client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Create a client whose requests time out after `timeout`
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Non-success status codes become [`ClientError::ApiError`] (or
    /// [`ClientError::NotFound`] for 404) carrying the response body.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let url = response.url().to_string();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(ClientError::NotFound(url));
            }
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}
