//! Liveness probing for the status-refresh sweep.
//!
//! The real probe is an external network service; the engine only consumes
//! the [`MetricProbe`] trait. [`FixedProbe`] is the in-process stand-in used
//! for embedded runs and tests.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Derived metrics for one record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeMetrics {
    /// Current follower count.
    pub follower_count: u64,
    /// Free-text video/publication state.
    pub video_state: String,
}

impl Default for ProbeMetrics {
    fn default() -> Self {
        Self {
            follower_count: 0,
            video_state: "Posted".to_string(),
        }
    }
}

/// Errors a probe can report for a single identifier.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The identifier could not be measured.
    #[error("probe unreachable for '{identifier}': {message}")]
    Unreachable {
        /// Identifier the probe failed on.
        identifier: String,
        /// Backend detail.
        message: String,
    },
}

/// Measures per-identifier metrics during the refresh sweep.
///
/// Implementations must tolerate being called once per data row in quick
/// succession; a failure for one identifier must not poison later calls.
pub trait MetricProbe: Send + Sync {
    /// Measures metrics for a single identifier.
    fn measure(&self, identifier: &str) -> Result<ProbeMetrics, ProbeError>;
}

/// Probe returning the same metrics for every identifier.
#[derive(Debug, Clone, Default)]
pub struct FixedProbe {
    metrics: ProbeMetrics,
    failing: HashSet<String>,
}

impl FixedProbe {
    /// Creates a probe that answers every identifier with `metrics`.
    #[must_use]
    pub fn new(metrics: ProbeMetrics) -> Self {
        Self {
            metrics,
            failing: HashSet::new(),
        }
    }

    /// Marks an identifier as unreachable; `measure` will error for it.
    #[must_use]
    pub fn with_failure(mut self, identifier: impl Into<String>) -> Self {
        self.failing.insert(identifier.into());
        self
    }
}

impl MetricProbe for FixedProbe {
    fn measure(&self, identifier: &str) -> Result<ProbeMetrics, ProbeError> {
        if self.failing.contains(identifier) {
            return Err(ProbeError::Unreachable {
                identifier: identifier.to_string(),
                message: "configured failure".to_string(),
            });
        }
        Ok(self.metrics.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_probe_answers_everything() {
        let probe = FixedProbe::new(ProbeMetrics {
            follower_count: 5000,
            video_state: "Posted".to_string(),
        });
        let metrics = probe.measure("u1").unwrap();
        assert_eq!(metrics.follower_count, 5000);
        assert_eq!(probe.measure("u2").unwrap(), metrics);
    }

    #[test]
    fn test_fixed_probe_configured_failure() {
        let probe = FixedProbe::default().with_failure("dead-account");
        assert!(probe.measure("alive").is_ok());

        let err = probe.measure("dead-account").unwrap_err();
        assert!(err.to_string().contains("dead-account"));
    }
}
