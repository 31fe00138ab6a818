//! `batchline-run`: replay one queue event through an external command.
//!
//! Reads the event JSON on stdin, runs `BATCH_COMMAND` (a JSON array such as
//! `["./handle-activity", "--dry-run"]`) once per message, and prints the
//! partial-failure response on stdout. Logs go to stderr.

use anyhow::Context;
use tokio::io::AsyncReadExt;

use batchline_batch::InvocationContext;
use batchline_events::QueueEvent;
use batchline_handler::{
    CommandProcessor, Handler, QueueBatchHandler, QueueHandlerConfig, WithLogging,
    invocation_timeout, require_env_list,
};
use batchline_observability::TraceId;

const COMMAND_ENV: &str = "BATCH_COMMAND";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    batchline_observability::init_to_stderr();

    let processor = CommandProcessor::from_argv(require_env_list(COMMAND_ENV)?)
        .with_context(|| format!("{COMMAND_ENV} must name a program"))?;
    let config = QueueHandlerConfig::from_env()?;

    let timeout = invocation_timeout()?;

    let mut raw = String::new();
    tokio::io::stdin()
        .read_to_string(&mut raw)
        .await
        .context("failed to read event from stdin")?;
    let event: QueueEvent = serde_json::from_str(&raw).context("stdin is not a queue event")?;

    let ctx = InvocationContext::with_timeout(timeout).with_trace_id(TraceId::from_env());
    tracing::info!(
        parent: ctx.span(),
        program = processor.program(),
        records = event.len(),
        timeout_ms = timeout.as_millis() as u64,
        "replaying queue event"
    );

    let handler = WithLogging::new(QueueBatchHandler::new(processor, config));
    let response = handler.call(&ctx, event).await?;

    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}
