//! `batchline-batch`: concurrent processing of a delivered batch.
//!
//! ## Flow
//!
//! 1. [`DeadlineBudgeter`] turns the invocation deadline into a working
//!    deadline (minus a safety margin).
//! 2. [`BatchCoordinator`] spawns one [`ItemWorker`] and one
//!    [`TimeoutSupervisor`] per item.
//! 3. Each supervisor yields exactly one [`WorkOutcome`].
//! 4. [`ResultAggregator`] turns the outcomes into a [`BatchResponse`]: the
//!    items the delivery platform must redeliver.
//!
//! Failed items are never retried here; redelivery is the platform's job.

pub mod aggregator;
pub mod config;
pub mod context;
pub mod coordinator;
pub mod deadline;
pub mod outcome;
pub mod pipeline;
pub mod processor;
pub mod supervisor;
pub mod worker;

pub use aggregator::{BatchReport, BatchResponse, ResultAggregator};
pub use config::{BatchConfig, DEFAULT_SAFETY_MARGIN, TimeoutPolicy};
pub use context::{DeadlineContext, InvocationContext};
pub use coordinator::BatchCoordinator;
pub use deadline::{DeadlineBudgeter, WorkingDeadline};
pub use outcome::{ItemOutcome, WorkOutcome};
pub use pipeline::BatchProcessor;
pub use processor::{FnProcessor, ItemProcessor, processor_fn};
pub use supervisor::TimeoutSupervisor;
pub use worker::ItemWorker;
