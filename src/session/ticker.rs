use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

/// A cancellable task that runs `tick` every `period`.
///
/// The task stops when `tick` returns `ControlFlow::Break`, when
/// [`RepeatingTask::cancel`] is called, or when the handle is dropped.
pub struct RepeatingTask {
    handle: JoinHandle<()>,
}

impl RepeatingTask {
    pub fn spawn<F, Fut>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                if tick().await.is_break() {
                    debug!("Repeating task finished");
                    break;
                }
            }
        });

        Self { handle }
    }

    pub fn cancel(self) {
        // Drop aborts
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for RepeatingTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting(count: &Arc<AtomicUsize>, stop_after: usize) -> RepeatingTask {
        let count = Arc::clone(count);
        RepeatingTask::spawn(Duration::from_secs(1), move || {
            let count = Arc::clone(&count);
            async move {
                if count.fetch_add(1, Ordering::SeqCst) + 1 >= stop_after {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            }
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_every_period() {
        let count = Arc::new(AtomicUsize::new(0));
        let _task = counting(&count, usize::MAX);

        time::sleep(Duration::from_millis(3500)).await;
        // Immediate first tick plus one per elapsed second
        assert_eq!(count.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_break_stops_the_task() {
        let count = Arc::new(AtomicUsize::new(0));
        let task = counting(&count, 2);

        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(task.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_ticking() {
        let count = Arc::new(AtomicUsize::new(0));
        let task = counting(&count, usize::MAX);

        time::sleep(Duration::from_millis(1500)).await;
        task.cancel();
        let seen = count.load(Ordering::SeqCst);

        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), seen);
    }
}
