//! Runs an external program once per item.

use std::io::ErrorKind;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use batchline_batch::{DeadlineContext, ItemProcessor};
use batchline_core::ProcessingError;
use batchline_events::Item;

/// Variable holding the item identifier in the child's environment.
pub const ITEM_ID_ENV: &str = "BATCH_ITEM_ID";
/// Variable holding the working deadline (RFC 3339) in the child's environment.
pub const ITEM_DEADLINE_ENV: &str = "BATCH_ITEM_DEADLINE";

/// Pipes each item body into a fresh child process; exit status 0 is success.
///
/// The child is killed when it outlives the working deadline.
#[derive(Debug, Clone)]
pub struct CommandProcessor {
    program: String,
    args: Vec<String>,
}

impl CommandProcessor {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build from `[program, arg...]`; `None` when the list is empty.
    pub fn from_argv(argv: Vec<String>) -> Option<Self> {
        let mut parts = argv.into_iter();
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl ItemProcessor for CommandProcessor {
    async fn process(&self, item: &Item, ctx: &DeadlineContext) -> Result<(), ProcessingError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env(ITEM_ID_ENV, item.id().as_str())
            .env(ITEM_DEADLINE_ENV, ctx.deadline().to_rfc3339())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ProcessingError::failed(format!("failed to spawn {}: {e}", self.program)))?;

        if let Some(mut stdin) = child.stdin.take() {
            match ctx.run(stdin.write_all(item.body())).await? {
                Ok(()) => {}
                // The child may exit without reading its input.
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {}
                Err(e) => {
                    return Err(ProcessingError::failed(format!("failed to write item body: {e}")));
                }
            }
            // Dropping stdin closes the pipe so the child sees EOF.
        }

        let status = ctx
            .run(child.wait())
            .await?
            .map_err(|e| ProcessingError::failed(format!("failed to wait for {}: {e}", self.program)))?;

        debug!(item_id = %item.id(), status = %status, "command finished");

        if status.success() {
            Ok(())
        } else {
            Err(ProcessingError::failed(format!("{} exited with {status}", self.program)))
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::time::Duration;

    use chrono::Utc;
    use tracing::Span;

    use batchline_batch::DeadlineBudgeter;
    use batchline_core::ItemId;

    use super::*;

    fn ctx_for(id: &ItemId, timeout: chrono::Duration) -> DeadlineContext {
        let deadline = DeadlineBudgeter::new(Duration::ZERO)
            .budget(Some(Utc::now() + timeout))
            .unwrap();
        DeadlineContext::new(id.clone(), deadline, Span::none())
    }

    fn sh(script: &str) -> CommandProcessor {
        CommandProcessor::new("sh", vec!["-c".to_string(), script.to_string()])
    }

    #[tokio::test]
    async fn zero_exit_is_success_and_body_is_piped() {
        let id = ItemId::new("A").unwrap();
        let item = Item::new(id.clone(), "hello");
        let processor = sh(r#"test "$(cat)" = hello && test "$BATCH_ITEM_ID" = A"#);

        processor
            .process(&item, &ctx_for(&id, chrono::Duration::seconds(10)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn non_zero_exit_is_failure() {
        let id = ItemId::new("A").unwrap();
        let item = Item::new(id.clone(), "");
        let err = sh("exit 3")
            .process(&item, &ctx_for(&id, chrono::Duration::seconds(10)))
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessingError::Failed(_)));
    }

    #[tokio::test]
    async fn missing_program_is_failure() {
        let id = ItemId::new("A").unwrap();
        let item = Item::new(id.clone(), "");
        let err = CommandProcessor::new("/definitely/not/a/program", vec![])
            .process(&item, &ctx_for(&id, chrono::Duration::seconds(10)))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to spawn"));
    }

    #[tokio::test]
    async fn child_outliving_deadline_is_failure() {
        let id = ItemId::new("A").unwrap();
        let item = Item::new(id.clone(), "");
        let err = sh("sleep 5")
            .process(&item, &ctx_for(&id, chrono::Duration::milliseconds(200)))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("exceeded"));
    }

    #[test]
    fn argv_needs_a_program() {
        assert!(CommandProcessor::from_argv(vec![]).is_none());
        let p = CommandProcessor::from_argv(vec!["./handle".into(), "--fast".into()]).unwrap();
        assert_eq!(p.program(), "./handle");
    }
}
