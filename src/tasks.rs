//! Background work whose result the UI picks up on a later frame

use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};

/// Where a background task stands when polled
#[derive(Debug)]
pub enum TaskStatus<T> {
    Running,
    Finished(T),
    /// The task ended without producing a value (it panicked)
    Lost,
}

/// A blocking job running on the tokio blocking pool
pub struct Pending<T> {
    rx: oneshot::Receiver<T>,
}

impl<T: Send + 'static> Pending<T> {
    /// Run `job` off the UI thread; `notify` fires once the result is ready
    pub fn spawn<F, N>(runtime: &Handle, job: F, notify: N) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
        N: FnOnce() + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        runtime.spawn_blocking(move || {
            let _ = tx.send(job());
            notify();
        });
        Self { rx }
    }

    /// Take the result if it is ready
    pub fn poll(&mut self) -> TaskStatus<T> {
        match self.rx.try_recv() {
            Ok(value) => TaskStatus::Finished(value),
            Err(TryRecvError::Empty) => TaskStatus::Running,
            Err(TryRecvError::Closed) => TaskStatus::Lost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn wait<T: Send + 'static>(pending: &mut Pending<T>) -> TaskStatus<T> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            match pending.poll() {
                TaskStatus::Running if Instant::now() < deadline => {
                    std::thread::sleep(Duration::from_millis(5))
                }
                status => return status,
            }
        }
    }

    #[test]
    fn test_pending_delivers_result_and_notifies() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .build()
            .unwrap();
        let notified = Arc::new(AtomicBool::new(false));
        let flag = notified.clone();
        let mut pending = Pending::spawn(runtime.handle(), || 40 + 2, move || {
            flag.store(true, Ordering::SeqCst)
        });

        assert!(matches!(wait(&mut pending), TaskStatus::Finished(42)));
        // notify runs right after the send
        let deadline = Instant::now() + Duration::from_secs(5);
        while !notified.load(Ordering::SeqCst) && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(notified.load(Ordering::SeqCst));
    }

    #[test]
    fn test_panicking_job_is_lost() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .build()
            .unwrap();
        let mut pending: Pending<u32> =
            Pending::spawn(runtime.handle(), || panic!("job failed"), || {});
        assert!(matches!(wait(&mut pending), TaskStatus::Lost));
    }
}
