//! Queue-triggered batch handler with partial-failure reporting.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use batchline_batch::{BatchProcessor, InvocationContext, ItemProcessor};
use batchline_events::{Batch, IdentifierSource, QueueEvent, QueueEventResponse};

use crate::config::QueueHandlerConfig;
use crate::error::HandlerError;
use crate::handler::Handler;

/// Processes every message of a queue event in parallel and answers with
/// the identifiers to redeliver.
pub struct QueueBatchHandler<P> {
    processor: BatchProcessor<P>,
    identifier: IdentifierSource,
}

impl<P: ItemProcessor> QueueBatchHandler<P> {
    pub fn new(processor: P, config: QueueHandlerConfig) -> Self {
        Self::from_arc(Arc::new(processor), config)
    }

    pub fn from_arc(processor: Arc<P>, config: QueueHandlerConfig) -> Self {
        Self {
            processor: BatchProcessor::from_arc(processor, config.batch),
            identifier: config.identifier,
        }
    }

    pub fn identifier(&self) -> IdentifierSource {
        self.identifier
    }
}

#[async_trait]
impl<P: ItemProcessor> Handler<QueueEvent> for QueueBatchHandler<P> {
    type Output = QueueEventResponse;

    async fn call(
        &self,
        ctx: &InvocationContext,
        event: QueueEvent,
    ) -> Result<QueueEventResponse, HandlerError> {
        debug!(parent: ctx.span(), records = event.len(), "received queue event");
        let batch = Batch::from_queue_event(event, self.identifier);
        let response = self.processor.process(ctx, batch).await?;
        Ok(response.into())
    }
}
