//! In-flight download tracking.

use std::sync::Arc;

use tokio::sync::watch;

/// Number of download calls currently running.
///
/// Every public download operation holds one [`TaskGuard`] for its whole
/// duration, nested operations included, so the count is of calls rather than
/// files. Subscribe to follow it from a progress display.
#[derive(Debug)]
pub struct DownloadStatus {
    active: watch::Sender<usize>,
}

impl DownloadStatus {
    pub fn new() -> Self {
        let (active, _) = watch::channel(0);
        Self { active }
    }

    /// Register a running task. The task ends when the guard is dropped.
    pub fn start_task(self: &Arc<Self>) -> TaskGuard {
        self.active.send_modify(|n| *n += 1);
        TaskGuard {
            status: Arc::clone(self),
        }
    }

    fn finish_task(&self) {
        self.active.send_modify(|n| *n = n.saturating_sub(1));
    }

    /// Current number of running tasks.
    pub fn active(&self) -> usize {
        *self.active.borrow()
    }

    /// Whether any download is running.
    pub fn is_downloading(&self) -> bool {
        self.active() > 0
    }

    /// Receive every change of the running task count.
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.active.subscribe()
    }
}

impl Default for DownloadStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// Marks one running download call.
#[must_use = "the task ends as soon as the guard is dropped"]
#[derive(Debug)]
pub struct TaskGuard {
    status: Arc<DownloadStatus>,
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.status.finish_task();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_balances_count() {
        let status = Arc::new(DownloadStatus::new());
        {
            let _outer = status.start_task();
            assert_eq!(status.active(), 1);
            {
                let _inner = status.start_task();
                assert_eq!(status.active(), 2);
            }
            assert_eq!(status.active(), 1);
        }
        assert_eq!(status.active(), 0);
        assert!(!status.is_downloading());
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let status = Arc::new(DownloadStatus::new());
        let mut rx = status.subscribe();

        let guard = status.start_task();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 1);

        drop(guard);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_are_not_lost() {
        let status = Arc::new(DownloadStatus::new());

        let mut handles = Vec::new();
        for _ in 0..32 {
            let status = Arc::clone(&status);
            handles.push(tokio::spawn(async move {
                for _ in 0..100 {
                    let _guard = status.start_task();
                    tokio::task::yield_now().await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(status.active(), 0);
    }
}
