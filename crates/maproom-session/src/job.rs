//! Cancellable background jobs
//!
//! Segmentation requests must be callable off the UI thread, cancellable
//! and immune to stale delivery. The scheme is a monotonic request id
//! per tool: issuing a request bumps the shared counter, and a token is
//! cancelled the moment any newer request (or an explicit cancel)
//! bumps it again. Late results are discarded by the id check at
//! delivery; long computations may also poll the token and bail early.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, TryRecvError, channel};
use std::sync::Arc;

/// Monotonic request-id source shared by one tool instance
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: Arc<AtomicU64>,
}

impl RequestTracker {
    /// Create a tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new request, superseding every earlier one
    pub fn issue(&self) -> CancelToken {
        let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        CancelToken {
            id,
            latest: self.latest.clone(),
        }
    }

    /// Cancel all outstanding requests
    pub fn cancel_all(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

/// Cooperative cancellation handle for one request
#[derive(Debug, Clone)]
pub struct CancelToken {
    id: u64,
    latest: Arc<AtomicU64>,
}

impl CancelToken {
    /// The request id this token belongs to
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether a newer request or a cancel superseded this one
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.latest.load(Ordering::SeqCst) != self.id
    }
}

/// Where jobs execute
///
/// The synchronous fallback and the offloaded implementation are
/// interchangeable behind this seam.
pub trait JobRunner {
    /// Run a job to completion
    fn run(&self, job: Box<dyn FnOnce() + Send + 'static>);
}

/// Runs each job on a fresh background thread
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRunner;

impl JobRunner for ThreadRunner {
    fn run(&self, job: Box<dyn FnOnce() + Send + 'static>) {
        std::thread::spawn(job);
    }
}

/// Runs each job immediately on the calling thread
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineRunner;

impl JobRunner for InlineRunner {
    fn run(&self, job: Box<dyn FnOnce() + Send + 'static>) {
        job();
    }
}

/// Receiving half of a spawned job
#[derive(Debug)]
pub struct JobHandle<T> {
    token: CancelToken,
    rx: Receiver<T>,
}

impl<T> JobHandle<T> {
    /// The token guarding this job
    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    /// Take the result if the job has finished
    ///
    /// Returns `None` while the job is still running or if the worker
    /// disappeared without sending.
    pub fn try_result(&self) -> Option<T> {
        match self.rx.try_recv() {
            Ok(value) => Some(value),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

/// Spawn a cancellable job on a runner
///
/// The job receives its token so it can poll for cancellation; whatever
/// it returns is delivered through the handle. Delivery of a stale
/// result is the caller's problem to detect via `token().is_cancelled()`.
pub fn spawn_job<T, F>(runner: &dyn JobRunner, token: CancelToken, job: F) -> JobHandle<T>
where
    T: Send + 'static,
    F: FnOnce(&CancelToken) -> T + Send + 'static,
{
    let (tx, rx) = channel();
    let job_token = token.clone();
    runner.run(Box::new(move || {
        let result = job(&job_token);
        // Receiver may be gone after a cancel; that is fine
        let _ = tx.send(result);
    }));
    JobHandle { token, rx }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_supersedes_previous() {
        let tracker = RequestTracker::new();
        let first = tracker.issue();
        assert!(!first.is_cancelled());
        let second = tracker.issue();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert!(second.id() > first.id());
    }

    #[test]
    fn test_cancel_all() {
        let tracker = RequestTracker::new();
        let token = tracker.issue();
        tracker.cancel_all();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_inline_job_delivers() {
        let tracker = RequestTracker::new();
        let handle = spawn_job(&InlineRunner, tracker.issue(), |_| 40 + 2);
        assert_eq!(handle.try_result(), Some(42));
        assert_eq!(handle.try_result(), None);
    }

    #[test]
    fn test_thread_job_delivers() {
        let tracker = RequestTracker::new();
        let handle = spawn_job(&ThreadRunner, tracker.issue(), |_| "done");
        // Poll until the worker lands
        let mut result = None;
        for _ in 0..200 {
            if let Some(v) = handle.try_result() {
                result = Some(v);
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        assert_eq!(result, Some("done"));
    }

    #[test]
    fn test_job_sees_cancellation() {
        let tracker = RequestTracker::new();
        let token = tracker.issue();
        tracker.cancel_all();
        let handle = spawn_job(&InlineRunner, token, |t| t.is_cancelled());
        assert_eq!(handle.try_result(), Some(true));
    }
}
