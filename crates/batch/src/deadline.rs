//! Working-deadline budgeting.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;

use batchline_core::{BatchError, BatchResult};

use crate::config::DEFAULT_SAFETY_MARGIN;

/// Deadline every item in a batch must finish by.
///
/// Carries both the wall-clock instant (for logs and for processors that talk
/// to remote APIs) and the monotonic instant the per-item timers are armed at.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WorkingDeadline {
    ambient: DateTime<Utc>,
    working: DateTime<Utc>,
    instant: Instant,
}

impl WorkingDeadline {
    /// Deadline of the whole invocation.
    pub fn ambient(&self) -> DateTime<Utc> {
        self.ambient
    }

    /// Deadline items are bounded by (ambient minus the safety margin).
    pub fn at(&self) -> DateTime<Utc> {
        self.working
    }

    pub fn instant(&self) -> Instant {
        self.instant
    }

    /// Time left before the working deadline (zero once it has passed).
    pub fn remaining(&self) -> Duration {
        self.instant.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.instant
    }
}

/// Derives the working deadline from the invocation deadline.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DeadlineBudgeter {
    margin: Duration,
}

impl Default for DeadlineBudgeter {
    fn default() -> Self {
        Self::new(DEFAULT_SAFETY_MARGIN)
    }
}

impl DeadlineBudgeter {
    pub fn new(margin: Duration) -> Self {
        Self { margin }
    }

    pub fn margin(&self) -> Duration {
        self.margin
    }

    /// Fails with [`BatchError::MissingDeadline`] when there is no deadline.
    ///
    /// A deadline closer than the margin yields an already-expired working
    /// deadline rather than an error: items still get dispatched and time out.
    pub fn budget(&self, ambient: Option<DateTime<Utc>>) -> BatchResult<WorkingDeadline> {
        let ambient = ambient.ok_or(BatchError::MissingDeadline)?;
        let margin = chrono::Duration::from_std(self.margin)
            .map_err(|_| BatchError::InvalidSafetyMargin(self.margin))?;
        let working = ambient
            .checked_sub_signed(margin)
            .ok_or(BatchError::InvalidSafetyMargin(self.margin))?;

        let remaining = (working - Utc::now()).to_std().unwrap_or(Duration::ZERO);

        Ok(WorkingDeadline {
            ambient,
            working,
            instant: Instant::now() + remaining,
        })
    }
}
