use std::{
    future::Future,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use futures::future::{BoxFuture, FutureExt};
use tokio::task::JoinHandle;

type Action<A> = Arc<dyn Fn(A) -> BoxFuture<'static, ()> + Send + Sync>;

/// Collapses bursts of calls into one deferred invocation of the wrapped
/// action, carrying the arguments of the last call.
///
/// Every [`Debouncer::call`] cancels the pending invocation (if any) and
/// schedules a new one `cooldown` later. Once the timer expires the action is
/// spawned on its own task, so a later call can no longer cancel it.
/// Dropping the debouncer cancels whatever is still pending.
pub struct Debouncer<A> {
    action: Action<A>,
    cooldown: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<A: Send + 'static> Debouncer<A> {
    pub fn limit<F, Fut>(action: F, cooldown: Duration) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            action: Arc::new(move |args| action(args).boxed()),
            cooldown,
            pending: Mutex::new(None),
        }
    }

    /// Must be called from within a tokio runtime.
    pub fn call(&self, args: A) {
        let mut pending = self.lock_pending();
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        let action = self.action.clone();
        let cooldown = self.cooldown;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(cooldown).await;
            tokio::spawn(action(args));
        }));
    }
}

impl<A> Debouncer<A> {
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn is_pending(&self) -> bool {
        self.lock_pending()
            .as_ref()
            .map_or(false, |timer| !timer.is_finished())
    }

    /// Cancels the pending invocation. Returns whether one was still waiting.
    pub fn cancel(&self) -> bool {
        match self.lock_pending().take() {
            Some(timer) => {
                let was_waiting = !timer.is_finished();
                timer.abort();
                was_waiting
            }
            None => false,
        }
    }

    fn lock_pending(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<A> Drop for Debouncer<A> {
    fn drop(&mut self) {
        if self.cancel() {
            log::debug!("dropped debouncer with a pending call");
        }
    }
}
