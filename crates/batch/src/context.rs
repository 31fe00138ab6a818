//! Request-scoped contexts.
//!
//! The logger is never looked up implicitly: each invocation owns a span, and
//! every item gets a child span that travels with its [`DeadlineContext`].

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;
use tracing::Span;

use batchline_core::{InvocationId, ItemId, ProcessingError};
use batchline_observability::TraceId;

use crate::deadline::WorkingDeadline;

/// Everything the delivery boundary knows about one invocation.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    invocation_id: InvocationId,
    deadline: Option<DateTime<Utc>>,
    trace_id: Option<TraceId>,
    span: Span,
}

impl InvocationContext {
    pub fn new(deadline: Option<DateTime<Utc>>) -> Self {
        let invocation_id = InvocationId::new();
        let span = tracing::info_span!(
            "invocation",
            invocation_id = %invocation_id,
            trace_id = tracing::field::Empty,
        );
        Self {
            invocation_id,
            deadline,
            trace_id: None,
            span,
        }
    }

    pub fn with_deadline(deadline: DateTime<Utc>) -> Self {
        Self::new(Some(deadline))
    }

    /// Deadline `timeout` from now. A timeout too large to represent leaves
    /// the context without a deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        let deadline = chrono::Duration::from_std(timeout)
            .ok()
            .and_then(|d| Utc::now().checked_add_signed(d));
        Self::new(deadline)
    }

    pub fn without_deadline() -> Self {
        Self::new(None)
    }

    pub fn with_trace_id(mut self, trace_id: Option<TraceId>) -> Self {
        if let Some(id) = &trace_id {
            self.span.record("trace_id", id.as_str());
        }
        self.trace_id = trace_id;
        self
    }

    pub fn invocation_id(&self) -> InvocationId {
        self.invocation_id
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}

/// What a processor receives alongside its item.
///
/// The deadline is advisory: the batch stops waiting at that point, and
/// processors should bound their own sub-operations with [`DeadlineContext::run`].
#[derive(Debug, Clone)]
pub struct DeadlineContext {
    item_id: ItemId,
    deadline: WorkingDeadline,
    span: Span,
}

impl DeadlineContext {
    pub fn new(item_id: ItemId, deadline: WorkingDeadline, span: Span) -> Self {
        Self {
            item_id,
            deadline,
            span,
        }
    }

    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    pub fn deadline(&self) -> DateTime<Utc> {
        self.deadline.at()
    }

    pub fn deadline_instant(&self) -> Instant {
        self.deadline.instant()
    }

    pub fn remaining(&self) -> Duration {
        self.deadline.remaining()
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_expired()
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Run `fut`, failing with [`ProcessingError::Failed`] if it is still
    /// pending at the working deadline.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, ProcessingError>
    where
        F: Future<Output = T>,
    {
        tokio::time::timeout_at(self.deadline.instant(), fut)
            .await
            .map_err(|_| ProcessingError::failed(format!("deadline {} exceeded", self.deadline())))
    }
}
