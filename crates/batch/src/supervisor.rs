//! Races one item's completion signal against its own timer.

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{error, warn};

use batchline_core::ItemId;

use crate::config::TimeoutPolicy;
use crate::outcome::{ItemOutcome, WorkOutcome};

/// Produces the terminal outcome of one item.
///
/// Every supervisor arms its own timer: a timer shared between items could
/// only wake one waiter.
pub struct TimeoutSupervisor {
    index: usize,
    item_id: ItemId,
    completion: oneshot::Receiver<bool>,
    worker: JoinHandle<()>,
    deadline: Instant,
    policy: TimeoutPolicy,
}

impl TimeoutSupervisor {
    pub fn new(
        index: usize,
        item_id: ItemId,
        completion: oneshot::Receiver<bool>,
        worker: JoinHandle<()>,
        deadline: Instant,
        policy: TimeoutPolicy,
    ) -> Self {
        Self {
            index,
            item_id,
            completion,
            worker,
            deadline,
            policy,
        }
    }

    /// Wait for whichever comes first. Always returns; never more than once.
    ///
    /// A completion that is ready in the same poll as the timer wins.
    pub async fn watch(self) -> ItemOutcome {
        let Self {
            index,
            item_id,
            completion,
            worker,
            deadline,
            policy,
        } = self;

        let outcome = tokio::select! {
            biased;

            signal = completion => match signal {
                Ok(true) => WorkOutcome::Succeeded,
                Ok(false) => WorkOutcome::Failed,
                Err(_) => {
                    error!(item_id = %item_id, "worker exited without reporting a result");
                    WorkOutcome::Failed
                }
            },
            () = tokio::time::sleep_until(deadline) => {
                warn!(item_id = %item_id, policy = ?policy, "item processing timed out");
                if policy == TimeoutPolicy::Abort {
                    worker.abort();
                }
                WorkOutcome::TimedOut
            }
        };

        ItemOutcome::new(index, item_id, outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use super::*;

    fn id() -> ItemId {
        ItemId::new("A").unwrap()
    }

    fn supervise(
        worker: JoinHandle<()>,
        completion: oneshot::Receiver<bool>,
        policy: TimeoutPolicy,
    ) -> TimeoutSupervisor {
        let deadline = Instant::now() + Duration::from_millis(1500);
        TimeoutSupervisor::new(3, id(), completion, worker, deadline, policy)
    }

    #[tokio::test(start_paused = true)]
    async fn success_signal_yields_succeeded() {
        let (tx, rx) = oneshot::channel();
        let worker = tokio::spawn(async move {
            let _ = tx.send(true);
        });

        let outcome = supervise(worker, rx, TimeoutPolicy::Abandon).watch().await;
        assert_eq!(outcome, ItemOutcome::new(3, id(), WorkOutcome::Succeeded));
    }

    #[tokio::test(start_paused = true)]
    async fn failure_signal_yields_failed() {
        let (tx, rx) = oneshot::channel();
        let worker = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            let _ = tx.send(false);
        });

        let outcome = supervise(worker, rx, TimeoutPolicy::Abandon).watch().await;
        assert_eq!(outcome.outcome, WorkOutcome::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_signal_yields_failed() {
        let (tx, rx) = oneshot::channel::<bool>();
        let worker = tokio::spawn(async move {
            drop(tx);
        });

        let outcome = supervise(worker, rx, TimeoutPolicy::Abandon).watch().await;
        assert_eq!(outcome.outcome, WorkOutcome::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn timer_first_yields_timed_out_and_abandons_worker() {
        let finished = Arc::new(AtomicBool::new(false));
        let (tx, rx) = oneshot::channel();
        let flag = finished.clone();
        let worker = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(10)).await;
            flag.store(true, Ordering::SeqCst);
            let _ = tx.send(true);
        });

        let started = Instant::now();
        let outcome = supervise(worker, rx, TimeoutPolicy::Abandon).watch().await;
        assert_eq!(outcome.outcome, WorkOutcome::TimedOut);
        assert!(started.elapsed() < Duration::from_secs(2));

        // Abandoned, not cancelled: the worker still runs to completion.
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn abort_policy_cancels_timed_out_worker() {
        let finished = Arc::new(AtomicBool::new(false));
        let (tx, rx) = oneshot::channel();
        let flag = finished.clone();
        let worker = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(10)).await;
            flag.store(true, Ordering::SeqCst);
            let _ = tx.send(true);
        });

        let outcome = supervise(worker, rx, TimeoutPolicy::Abort).watch().await;
        assert_eq!(outcome.outcome, WorkOutcome::TimedOut);

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert!(!finished.load(Ordering::SeqCst));
    }
}
