//! The per-item processing collaborator.

use std::future::Future;

use async_trait::async_trait;

use batchline_core::ProcessingError;
use batchline_events::Item;

use crate::context::DeadlineContext;

/// Business logic applied to one item.
///
/// Implementations own their I/O and retries; the batch only distinguishes
/// `Ok` from `Err`. Panics are contained by the worker and count as failures.
#[async_trait]
pub trait ItemProcessor: Send + Sync + 'static {
    async fn process(&self, item: &Item, ctx: &DeadlineContext) -> Result<(), ProcessingError>;
}

/// Adapter turning an async closure into an [`ItemProcessor`].
#[derive(Debug, Clone)]
pub struct FnProcessor<F> {
    f: F,
}

/// Wrap `f` as an [`ItemProcessor`]. The closure receives owned clones.
pub fn processor_fn<F, Fut>(f: F) -> FnProcessor<F>
where
    F: Fn(Item, DeadlineContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ProcessingError>> + Send + 'static,
{
    FnProcessor { f }
}

#[async_trait]
impl<F, Fut> ItemProcessor for FnProcessor<F>
where
    F: Fn(Item, DeadlineContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ProcessingError>> + Send + 'static,
{
    async fn process(&self, item: &Item, ctx: &DeadlineContext) -> Result<(), ProcessingError> {
        (self.f)(item.clone(), ctx.clone()).await
    }
}
