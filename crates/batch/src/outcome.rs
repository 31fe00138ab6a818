use serde::Serialize;

use batchline_core::ItemId;

/// Terminal classification of one item. `Dispatched` is implicit: an item
/// has no outcome until its supervisor produces exactly one of these.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkOutcome {
    Succeeded,
    Failed,
    TimedOut,
}

impl WorkOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, WorkOutcome::Succeeded)
    }

    /// Whether the delivery platform must redeliver the item.
    pub fn requires_redelivery(&self) -> bool {
        !self.is_success()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkOutcome::Succeeded => "succeeded",
            WorkOutcome::Failed => "failed",
            WorkOutcome::TimedOut => "timed_out",
        }
    }
}

impl core::fmt::Display for WorkOutcome {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one item, tagged with its position in the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    pub index: usize,
    pub item_id: ItemId,
    pub outcome: WorkOutcome,
}

impl ItemOutcome {
    pub fn new(index: usize, item_id: ItemId, outcome: WorkOutcome) -> Self {
        Self {
            index,
            item_id,
            outcome,
        }
    }
}
