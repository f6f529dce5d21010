//! Cancellable deferred tasks.
//!
//! Each task is keyed by an owner (a visitor's session id) and a [`TaskKind`].
//! At most one task per key is pending: scheduling again aborts the earlier
//! one, and [`Scheduler::cancel`] aborts it outright.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::AbortHandle;

/// What a deferred task does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Clear the cart once the checkout redirect delay has passed.
    CheckoutCompletion,
}

type TaskKey = (String, TaskKind);

struct Pending {
    generation: u64,
    handle: AbortHandle,
}

/// Registry of pending deferred tasks.
#[derive(Clone, Default)]
pub struct Scheduler {
    tasks: Arc<Mutex<HashMap<TaskKey, Pending>>>,
    generation: Arc<AtomicU64>,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("pending", &self.lock().len())
            .finish()
    }
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<TaskKey, Pending>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `task` after `delay`, replacing any pending task for the same key.
    ///
    /// Returns `true` if a pending task was superseded.
    pub fn schedule<F>(&self, owner: &str, kind: TaskKind, delay: Duration, task: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let key: TaskKey = (owner.to_owned(), kind);
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);

        // Hold the lock until the handle is registered so the task cannot
        // observe the map before its own entry exists.
        let mut tasks = self.lock();

        let registry = Arc::clone(&self.tasks);
        let task_key = key.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut tasks = registry.lock().unwrap_or_else(PoisonError::into_inner);
                let current = tasks
                    .get(&task_key)
                    .is_some_and(|pending| pending.generation == generation);
                if !current {
                    return;
                }
                tasks.remove(&task_key);
            }
            task.await;
        });

        let previous = tasks.insert(
            key,
            Pending {
                generation,
                handle: handle.abort_handle(),
            },
        );
        drop(tasks);

        previous.is_some_and(|pending| {
            pending.handle.abort();
            tracing::debug!(owner, ?kind, "Superseded pending task");
            true
        })
    }

    /// Abort the pending task for a key. Returns whether one was pending.
    pub fn cancel(&self, owner: &str, kind: TaskKind) -> bool {
        let removed = self.lock().remove(&(owner.to_owned(), kind));
        removed.is_some_and(|pending| {
            pending.handle.abort();
            tracing::debug!(owner, ?kind, "Cancelled pending task");
            true
        })
    }

    /// Whether a task is pending for a key.
    #[must_use]
    pub fn is_pending(&self, owner: &str, kind: TaskKind) -> bool {
        self.lock().contains_key(&(owner.to_owned(), kind))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    const DELAY: Duration = Duration::from_millis(1500);

    fn counter_task(counter: &Arc<AtomicUsize>) -> impl Future<Output = ()> + Send + 'static {
        let counter = Arc::clone(counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_fires_after_delay() {
        let scheduler = Scheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));

        scheduler.schedule("s1", TaskKind::CheckoutCompletion, DELAY, counter_task(&fired));
        assert!(scheduler.is_pending("s1", TaskKind::CheckoutCompletion));

        tokio::time::sleep(Duration::from_millis(1499)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!scheduler.is_pending("s1", TaskKind::CheckoutCompletion));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_supersedes() {
        let scheduler = Scheduler::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        assert!(!scheduler.schedule("s1", TaskKind::CheckoutCompletion, DELAY, counter_task(&first)));
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(scheduler.schedule("s1", TaskKind::CheckoutCompletion, DELAY, counter_task(&second)));

        // The original deadline passes without the first task firing.
        tokio::time::sleep(Duration::from_millis(600)).await;
        tokio::task::yield_now().await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        tokio::task::yield_now().await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_firing() {
        let scheduler = Scheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));

        scheduler.schedule("s1", TaskKind::CheckoutCompletion, DELAY, counter_task(&fired));
        assert!(scheduler.cancel("s1", TaskKind::CheckoutCompletion));
        assert!(!scheduler.cancel("s1", TaskKind::CheckoutCompletion));

        tokio::time::sleep(Duration::from_secs(5)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_owners_are_independent() {
        let scheduler = Scheduler::new();
        let a = Arc::new(AtomicUsize::new(0));
        let b = Arc::new(AtomicUsize::new(0));

        scheduler.schedule("a", TaskKind::CheckoutCompletion, DELAY, counter_task(&a));
        scheduler.schedule("b", TaskKind::CheckoutCompletion, DELAY, counter_task(&b));
        scheduler.cancel("a", TaskKind::CheckoutCompletion);

        tokio::time::sleep(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(a.load(Ordering::SeqCst), 0);
        assert_eq!(b.load(Ordering::SeqCst), 1);
    }
}
