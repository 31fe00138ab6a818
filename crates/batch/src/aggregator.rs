//! Collects terminal outcomes into the redelivery response.

use std::collections::HashSet;

use tracing::warn;

use batchline_core::ItemId;
use batchline_events::QueueEventResponse;

use crate::outcome::{ItemOutcome, WorkOutcome};

/// Single reader of all outcomes in a batch.
///
/// Owned by the coordinator and fed sequentially, so the failure list needs
/// no lock.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    outcomes: Vec<ItemOutcome>,
    seen: HashSet<usize>,
}

impl ResultAggregator {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            outcomes: Vec::with_capacity(capacity),
            seen: HashSet::with_capacity(capacity),
        }
    }

    /// Record one outcome. A second outcome for the same batch position is
    /// dropped and `false` is returned.
    pub fn record(&mut self, outcome: ItemOutcome) -> bool {
        if !self.seen.insert(outcome.index) {
            warn!(
                item_id = %outcome.item_id,
                index = outcome.index,
                "duplicate outcome ignored"
            );
            return false;
        }
        self.outcomes.push(outcome);
        true
    }

    pub fn has(&self, index: usize) -> bool {
        self.seen.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Outcomes restored to batch order.
    pub fn finish(mut self) -> BatchReport {
        self.outcomes.sort_by_key(|o| o.index);
        BatchReport {
            outcomes: self.outcomes,
        }
    }
}

/// Every item's outcome, in batch order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    outcomes: Vec<ItemOutcome>,
}

impl BatchReport {
    pub fn outcomes(&self) -> &[ItemOutcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn count(&self, outcome: WorkOutcome) -> usize {
        self.outcomes.iter().filter(|o| o.outcome == outcome).count()
    }

    pub fn succeeded(&self) -> usize {
        self.count(WorkOutcome::Succeeded)
    }

    pub fn failed(&self) -> usize {
        self.count(WorkOutcome::Failed)
    }

    pub fn timed_out(&self) -> usize {
        self.count(WorkOutcome::TimedOut)
    }

    pub fn outcome_of(&self, id: &ItemId) -> Option<WorkOutcome> {
        self.outcomes
            .iter()
            .find(|o| &o.item_id == id)
            .map(|o| o.outcome)
    }

    /// Items that failed or timed out, in batch order.
    ///
    /// A repeated identifier is listed once, at its first failing position.
    pub fn response(&self) -> BatchResponse {
        let mut listed = HashSet::new();
        BatchResponse {
            failed: self
                .outcomes
                .iter()
                .filter(|o| o.outcome.requires_redelivery())
                .map(|o| &o.item_id)
                .filter(|id| listed.insert(*id))
                .cloned()
                .collect(),
        }
    }
}

/// Identifiers the delivery platform must redeliver.
///
/// Empty iff every item succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResponse {
    failed: Vec<ItemId>,
}

impl BatchResponse {
    pub fn failed_ids(&self) -> &[ItemId] {
        &self.failed
    }

    pub fn len(&self) -> usize {
        self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failed.is_empty()
    }
}

impl From<BatchResponse> for QueueEventResponse {
    fn from(value: BatchResponse) -> Self {
        QueueEventResponse::from_identifiers(value.failed.into_iter().map(ItemId::into_inner))
    }
}
