//! Error model for batch processing.
//!
//! Two tiers, never mixed:
//! - [`BatchError`] is fatal for a whole invocation; no items are dispatched.
//! - [`ProcessingError`] belongs to a single item and is always contained at
//!   the item boundary (it becomes a failed outcome, never a batch error).

use std::time::Duration;

use thiserror::Error;

/// Result type for batch-level operations.
pub type BatchResult<T> = Result<T, BatchError>;

/// Batch-fatal error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// The invocation carried no deadline; nothing can be budgeted.
    #[error("invocation context must carry a deadline")]
    MissingDeadline,

    /// The configured safety margin cannot be subtracted from the deadline.
    #[error("invalid safety margin: {0:?}")]
    InvalidSafetyMargin(Duration),

    /// An item identifier was malformed. Raised when admitting a single
    /// record; admission skips that record instead of failing the batch.
    #[error("invalid item identifier: {0}")]
    InvalidItemId(String),
}

impl BatchError {
    pub fn invalid_item_id(msg: impl Into<String>) -> Self {
        Self::InvalidItemId(msg.into())
    }
}

/// Failure reported for a single item by the external processor.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("processing failed: {0}")]
    Failed(String),

    /// The processor panicked; converted here so one item cannot abort the batch.
    #[error("processor panicked: {0}")]
    Panicked(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ProcessingError {
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}
