//! Batch processing configuration.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Time reserved between the working deadline and the invocation deadline
/// for aggregation and response serialization.
pub const DEFAULT_SAFETY_MARGIN: Duration = Duration::from_millis(500);

/// What happens to a worker task whose item timed out.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutPolicy {
    /// Stop waiting; the task is detached and left to finish on its own.
    #[default]
    Abandon,
    /// Abort the task at its next suspension point.
    Abort,
}

impl FromStr for TimeoutPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abandon" => Ok(Self::Abandon),
            "abort" => Ok(Self::Abort),
            other => Err(format!("unknown timeout policy: {other}")),
        }
    }
}

/// Batch processor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Subtracted from the invocation deadline to get the working deadline.
    pub safety_margin: Duration,
    /// Handling of workers that outlive the working deadline.
    pub timeout_policy: TimeoutPolicy,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            safety_margin: DEFAULT_SAFETY_MARGIN,
            timeout_policy: TimeoutPolicy::Abandon,
        }
    }
}

impl BatchConfig {
    pub fn with_safety_margin(mut self, margin: Duration) -> Self {
        self.safety_margin = margin;
        self
    }

    pub fn with_timeout_policy(mut self, policy: TimeoutPolicy) -> Self {
        self.timeout_policy = policy;
        self
    }
}
