//! Entry point tying budgeter, coordinator and aggregator together.

use std::sync::Arc;

use tracing::{debug, info};

use batchline_core::BatchResult;
use batchline_events::Batch;

use crate::aggregator::{BatchReport, BatchResponse};
use crate::config::BatchConfig;
use crate::context::InvocationContext;
use crate::coordinator::BatchCoordinator;
use crate::deadline::DeadlineBudgeter;
use crate::processor::ItemProcessor;

/// Processes a batch of independent items under one invocation deadline.
///
/// Item-level faults never surface as errors; only a missing deadline (or an
/// unusable margin) fails the call, and then no item is dispatched.
pub struct BatchProcessor<P> {
    budgeter: DeadlineBudgeter,
    coordinator: BatchCoordinator<P>,
}

impl<P: ItemProcessor> BatchProcessor<P> {
    pub fn new(processor: P, config: BatchConfig) -> Self {
        Self::from_arc(Arc::new(processor), config)
    }

    pub fn from_arc(processor: Arc<P>, config: BatchConfig) -> Self {
        Self {
            budgeter: DeadlineBudgeter::new(config.safety_margin),
            coordinator: BatchCoordinator::new(processor, config.timeout_policy),
        }
    }

    pub async fn process(&self, ctx: &InvocationContext, batch: Batch) -> BatchResult<BatchResponse> {
        Ok(self.process_report(ctx, batch).await?.response())
    }

    /// Like [`BatchProcessor::process`], keeping every item's outcome.
    pub async fn process_report(
        &self,
        ctx: &InvocationContext,
        batch: Batch,
    ) -> BatchResult<BatchReport> {
        let deadline = self.budgeter.budget(ctx.deadline())?;
        let span = ctx.span();
        let items = batch.len();

        debug!(
            parent: span,
            items,
            working_deadline = %deadline.at(),
            remaining_ms = deadline.remaining().as_millis() as u64,
            "dispatching batch"
        );

        let report = self.coordinator.run(batch, deadline, span).await;

        info!(
            parent: span,
            items,
            succeeded = report.succeeded(),
            failed = report.failed(),
            timed_out = report.timed_out(),
            "batch processed"
        );

        Ok(report)
    }
}
