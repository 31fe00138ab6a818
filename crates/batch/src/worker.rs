//! Runs the processor for exactly one item.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error};

use batchline_core::ProcessingError;
use batchline_events::Item;

use crate::context::DeadlineContext;
use crate::processor::ItemProcessor;

/// One processor invocation for one item.
///
/// Reports a single `bool` on its own completion channel: `true` on success,
/// `false` on error or panic. Failures are logged here and nowhere else.
pub struct ItemWorker<P> {
    processor: Arc<P>,
    item: Item,
    ctx: DeadlineContext,
}

impl<P: ItemProcessor> ItemWorker<P> {
    pub fn new(processor: Arc<P>, item: Item, ctx: DeadlineContext) -> Self {
        Self {
            processor,
            item,
            ctx,
        }
    }

    /// Spawn onto the runtime. Dropping the handle detaches the task.
    pub fn spawn(self, completion: oneshot::Sender<bool>) -> JoinHandle<()> {
        let span = self.ctx.span().clone();
        tokio::spawn(self.run(completion).instrument(span))
    }

    async fn run(self, completion: oneshot::Sender<bool>) {
        let result = AssertUnwindSafe(self.processor.process(&self.item, &self.ctx))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(ProcessingError::Panicked(panic_message(panic.as_ref()))));

        let succeeded = match result {
            Ok(()) => {
                debug!(item_id = %self.item.id(), "item processed");
                true
            }
            Err(err) => {
                error!(item_id = %self.item.id(), error = %err, "item processing failed");
                false
            }
        };

        // Receiver is gone once the supervisor's timer fired first.
        let _ = completion.send(succeeded);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deadline::DeadlineBudgeter;
    use crate::processor::processor_fn;
    use batchline_core::ItemId;
    use chrono::Utc;
    use tracing::Span;

    fn worker_for<P: ItemProcessor>(processor: P) -> ItemWorker<P> {
        let id = ItemId::new("A").unwrap();
        let deadline = DeadlineBudgeter::default()
            .budget(Some(Utc::now() + chrono::Duration::seconds(2)))
            .unwrap();
        let ctx = DeadlineContext::new(id.clone(), deadline, Span::none());
        ItemWorker::new(Arc::new(processor), Item::new(id, "payload"), ctx)
    }

    #[tokio::test]
    async fn success_reports_true() {
        let worker = worker_for(processor_fn(|item: Item, _ctx| async move {
            assert_eq!(item.body(), b"payload");
            Ok(())
        }));
        let (tx, rx) = oneshot::channel();
        worker.spawn(tx).await.unwrap();
        assert_eq!(rx.await, Ok(true));
    }

    #[tokio::test]
    async fn error_reports_false() {
        let worker = worker_for(processor_fn(|_item, _ctx| async {
            Err(ProcessingError::failed("something bad happened"))
        }));
        let (tx, rx) = oneshot::channel();
        worker.spawn(tx).await.unwrap();
        assert_eq!(rx.await, Ok(false));
    }

    #[tokio::test]
    async fn panic_is_contained_and_reports_false() {
        let worker = worker_for(processor_fn(|_item, _ctx| async {
            if true {
                panic!("processor blew up");
            }
            Ok(())
        }));
        let (tx, rx) = oneshot::channel();

        let joined = worker.spawn(tx).await;
        assert!(joined.is_ok(), "panic must not escape the worker task");
        assert_eq!(rx.await, Ok(false));
    }

    #[test]
    fn panic_payloads_are_rendered() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42_u8), "non-string panic payload");
    }
}
