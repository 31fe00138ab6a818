//! Fans a batch out to one worker/supervisor pair per item.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinSet;
use tracing::{Instrument, Span, error};

use batchline_core::ItemId;
use batchline_events::Batch;

use crate::aggregator::{BatchReport, ResultAggregator};
use crate::config::TimeoutPolicy;
use crate::context::DeadlineContext;
use crate::deadline::WorkingDeadline;
use crate::outcome::{ItemOutcome, WorkOutcome};
use crate::processor::ItemProcessor;
use crate::supervisor::TimeoutSupervisor;
use crate::worker::ItemWorker;

/// Runs every item of a batch concurrently and joins on all outcomes.
///
/// Items are independent: no item waits on, cancels, or delays another.
/// Fan-out is unbounded; the delivery platform caps batch size.
pub struct BatchCoordinator<P> {
    processor: Arc<P>,
    policy: TimeoutPolicy,
}

impl<P: ItemProcessor> BatchCoordinator<P> {
    pub fn new(processor: Arc<P>, policy: TimeoutPolicy) -> Self {
        Self { processor, policy }
    }

    pub fn policy(&self) -> TimeoutPolicy {
        self.policy
    }

    /// Dispatch all items and block until each has a terminal outcome.
    pub async fn run(&self, batch: Batch, deadline: WorkingDeadline, parent: &Span) -> BatchReport {
        let mut supervisors = JoinSet::new();
        let mut dispatched: BTreeMap<usize, ItemId> = BTreeMap::new();

        for (index, item) in batch.into_items().into_iter().enumerate() {
            let item_id = item.id().clone();
            let span = tracing::info_span!(parent: parent, "item", item_id = %item_id);
            let ctx = DeadlineContext::new(item_id.clone(), deadline, span.clone());

            let (completion_tx, completion_rx) = oneshot::channel();
            let worker = ItemWorker::new(Arc::clone(&self.processor), item, ctx).spawn(completion_tx);
            let supervisor = TimeoutSupervisor::new(
                index,
                item_id.clone(),
                completion_rx,
                worker,
                deadline.instant(),
                self.policy,
            );

            supervisors.spawn(supervisor.watch().instrument(span));
            dispatched.insert(index, item_id);
        }

        let mut aggregator = ResultAggregator::with_capacity(dispatched.len());
        while let Some(joined) = supervisors.join_next().await {
            match joined {
                Ok(outcome) => {
                    aggregator.record(outcome);
                }
                Err(err) => {
                    error!(parent: parent, error = %err, "item supervisor did not complete");
                }
            }
        }

        // A supervisor lost to a JoinError still owes its item an outcome.
        for (index, item_id) in dispatched {
            if !aggregator.has(index) {
                aggregator.record(ItemOutcome::new(index, item_id, WorkOutcome::Failed));
            }
        }

        aggregator.finish()
    }
}
