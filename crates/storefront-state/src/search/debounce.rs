//! # Cancellable Timers
//!
//! `schedule(delay, token, task) -> CancelHandle`: run `task` after `delay`
//! unless the token was cancelled first.
//!
//! ## Cancellation Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  t=0    schedule("ring")  ──► token A                                   │
//! │  t=120  schedule("ring2") ──► cancel(A), token B                        │
//! │  t=300  A's sleep would end ──► aborted / sees A cancelled ──► nothing  │
//! │  t=420  B fires ──► task runs, checks B under the store lock each step  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! The spawned task is aborted as well, but abort only takes effect at an
//! await point. Tasks must therefore re-check their token (under the lock
//! that guards the state they write) before every state change.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;

use crate::error::{StateError, StateResult};

/// A boxed unit of deferred work.
pub type ScheduledTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Handle returned by [`Scheduler::schedule`].
#[derive(Debug)]
pub struct CancelHandle {
    token: CancelToken,
    abort: Option<AbortHandle>,
}

impl CancelHandle {
    pub fn new(token: CancelToken, abort: Option<AbortHandle>) -> Self {
        CancelHandle { token, abort }
    }

    /// Cancels the token and aborts the underlying task, if any.
    pub fn cancel(&self) {
        self.token.cancel();
        if let Some(abort) = &self.abort {
            abort.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Defers work. Implemented over tokio in production; tests may substitute
/// their own.
pub trait Scheduler: Send + Sync + fmt::Debug {
    fn schedule(&self, delay: Duration, token: CancelToken, task: ScheduledTask) -> CancelHandle;
}

/// [`Scheduler`] spawning onto a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    /// Binds to the runtime the caller is running in.
    pub fn current() -> StateResult<Self> {
        Handle::try_current()
            .map(Self::from_handle)
            .map_err(|e| StateError::SchedulerUnavailable(e.to_string()))
    }

    pub fn from_handle(handle: Handle) -> Self {
        TokioScheduler { handle }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, token: CancelToken, task: ScheduledTask) -> CancelHandle {
        let task_token = token.clone();
        let join = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if task_token.is_cancelled() {
                return;
            }
            task.await;
        });
        CancelHandle::new(token, Some(join.abort_handle()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting_task(counter: &Arc<AtomicUsize>) -> ScheduledTask {
        let counter = Arc::clone(counter);
        Box::pin(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_runs_after_delay() {
        let scheduler = TokioScheduler::current().unwrap();
        let runs = Arc::new(AtomicUsize::new(0));

        scheduler.schedule(
            Duration::from_millis(300),
            CancelToken::new(),
            counting_task(&runs),
        );

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_task_never_runs() {
        let scheduler = TokioScheduler::current().unwrap();
        let runs = Arc::new(AtomicUsize::new(0));

        let handle = scheduler.schedule(
            Duration::from_millis(300),
            CancelToken::new(),
            counting_task(&runs),
        );
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.cancel();
        assert!(handle.is_cancelled());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_current_without_runtime_fails() {
        assert!(matches!(
            TokioScheduler::current(),
            Err(StateError::SchedulerUnavailable(_))
        ));
    }
}
