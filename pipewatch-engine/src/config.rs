//! Engine configuration
//!
//! Defines the configurable parameters for watching jobs: where the
//! pipeline API lives, how often to poll it and how long to wait for it.

use std::time::Duration;

/// Default polling interval
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);

/// Engine configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Pipeline API base URL (e.g., "http://localhost:8000")
    pub api_url: String,

    /// How often a watched job's status is fetched
    pub poll_interval: Duration,

    /// Timeout for a single HTTP request
    pub request_timeout: Duration,

    /// Buffered watch events per subscriber before the oldest are dropped
    pub event_capacity: usize,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(api_url: String) -> Self {
        Self {
            api_url,
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: Duration::from_secs(30),
            event_capacity: 256,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - PIPEWATCH_API_URL (optional, default: http://localhost:8000)
    /// - POLL_INTERVAL_MS (optional, milliseconds, default: 3000)
    /// - REQUEST_TIMEOUT_SECS (optional, seconds, default: 30)
    /// - EVENT_CAPACITY (optional, default: 256)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from a variable lookup
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let api_url = lookup("PIPEWATCH_API_URL").unwrap_or(defaults.api_url);

        let poll_interval = parse_var::<u64>(&lookup, "POLL_INTERVAL_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.poll_interval);

        let request_timeout = parse_var::<u64>(&lookup, "REQUEST_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let event_capacity =
            parse_var::<usize>(&lookup, "EVENT_CAPACITY")?.unwrap_or(defaults.event_capacity);

        Ok(Self {
            api_url,
            poll_interval,
            request_timeout,
            event_capacity,
        })
    }

    /// Overrides the polling interval
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_url.is_empty() {
            anyhow::bail!("api_url cannot be empty");
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            anyhow::bail!("api_url must start with http:// or https://");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        if self.event_capacity == 0 {
            anyhow::bail!("event_capacity must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("http://localhost:8000".to_string())
    }
}

/// Reads and parses an optional variable
fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{} has an invalid value '{}': {}", name, raw, e)),
        None => Ok(None),
    }
}
