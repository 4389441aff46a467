//! Poller keys

use std::fmt;

/// Opaque name of one repeating poller
///
/// At most one poller runs per key. Domain code builds keys through
/// [`PollerKey::namespaced`] so that different owners sharing a scheduler
/// never collide (`pipeline-42`, `report-42`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PollerKey(String);

impl PollerKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Builds `"{namespace}-{id}"`
    pub fn namespaced(namespace: &str, id: impl fmt::Display) -> Self {
        Self(format!("{}-{}", namespace, id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the id part if this key belongs to `namespace`
    pub fn strip_namespace(&self, namespace: &str) -> Option<&str> {
        self.0
            .strip_prefix(namespace)
            .and_then(|rest| rest.strip_prefix('-'))
    }
}

impl fmt::Display for PollerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PollerKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PollerKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespaced_key() {
        let key = PollerKey::namespaced("pipeline", 42);
        assert_eq!(key.as_str(), "pipeline-42");
        assert_eq!(key.strip_namespace("pipeline"), Some("42"));
        assert_eq!(key.strip_namespace("report"), None);
    }

    #[test]
    fn test_strip_namespace_requires_separator() {
        let key = PollerKey::new("pipelines");
        assert_eq!(key.strip_namespace("pipeline"), None);
    }
}
