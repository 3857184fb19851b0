//! Run only the last of a burst of calls

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Delays calls, so that only the last one of calls made within `delay` of each other is run.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<Pending>,
}

#[derive(Debug)]
struct Pending {
    handle: JoinHandle<()>,
    /// Set once the timer has fired. The call is not cancellable anymore past this point.
    fired: Arc<AtomicBool>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `task` to run after the delay, cancelling the previously scheduled call if its timer has not fired yet.
    pub fn call<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        let fired = Arc::new(AtomicBool::new(false));
        let fired_clone = Arc::clone(&fired);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fired_clone.store(true, Ordering::SeqCst);
            task.await;
        });
        self.pending = Some(Pending { handle, fired });
    }

    /// Cancel the pending call, if its timer has not fired yet
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            if pending.fired.load(Ordering::SeqCst) == false {
                pending.handle.abort();
            }
        }
    }

    /// Whether a call is scheduled and has not completed yet
    pub fn is_pending(&self) -> bool {
        match &self.pending {
            Some(pending) => pending.handle.is_finished() == false,
            None => false,
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
