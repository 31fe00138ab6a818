//! Generic invocation handler abstraction.

use std::future::Future;

use async_trait::async_trait;
use tracing::{Instrument, error};

use batchline_batch::InvocationContext;

use crate::error::HandlerError;

/// Handles one invocation carrying an event of type `E`.
#[async_trait]
pub trait Handler<E>: Send + Sync
where
    E: Send + 'static,
{
    type Output: Send;

    async fn call(&self, ctx: &InvocationContext, event: E) -> Result<Self::Output, HandlerError>;
}

/// Adapter turning an async closure into a [`Handler`].
#[derive(Debug, Clone)]
pub struct FnHandler<F> {
    f: F,
}

/// Wrap `f` as a [`Handler`]. The closure receives an owned context clone.
pub fn handler_fn<E, O, F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(InvocationContext, E) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, HandlerError>> + Send + 'static,
{
    FnHandler { f }
}

#[async_trait]
impl<E, O, F, Fut> Handler<E> for FnHandler<F>
where
    E: Send + 'static,
    O: Send + 'static,
    F: Fn(InvocationContext, E) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, HandlerError>> + Send + 'static,
{
    type Output = O;

    async fn call(&self, ctx: &InvocationContext, event: E) -> Result<O, HandlerError> {
        (self.f)(ctx.clone(), event).await
    }
}

/// Runs the inner handler inside the invocation span and logs failures.
///
/// The inner result is passed through untouched.
#[derive(Debug, Clone)]
pub struct WithLogging<H> {
    inner: H,
}

impl<H> WithLogging<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }
}

#[async_trait]
impl<E, H> Handler<E> for WithLogging<H>
where
    E: Send + 'static,
    H: Handler<E>,
{
    type Output = H::Output;

    async fn call(&self, ctx: &InvocationContext, event: E) -> Result<Self::Output, HandlerError> {
        let span = ctx.span().clone();
        let result = self.inner.call(ctx, event).instrument(span.clone()).await;
        if let Err(err) = &result {
            error!(parent: &span, error = %err, "invocation failed");
        }
        result
    }
}
