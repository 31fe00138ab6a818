//! `batchline-handler`: the invocation boundary.
//!
//! Turns delivered queue events into batches, runs them through
//! [`batchline_batch::BatchProcessor`], and answers with the partial-failure
//! response the queue trigger expects.

pub mod command;
pub mod config;
pub mod error;
pub mod handler;
pub mod queue;

pub use command::CommandProcessor;
pub use config::{
    ConfigError, QueueHandlerConfig, invocation_timeout, require_env, require_env_list,
};
pub use error::HandlerError;
pub use handler::{FnHandler, Handler, WithLogging, handler_fn};
pub use queue::QueueBatchHandler;
