//! Per-call deadline and cancellation.
//!
//! Every request is issued under a [`RequestContext`]. Executors call
//! [`RequestContext::check`] immediately before sending: a cancelled or
//! expired context fails the request without touching the network, and a
//! live context yields the time budget that remains for it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::Error;

/// Deadline and cancellation state shared by every request of one call.
///
/// Clones share the cancellation flag, so cancelling any clone (or a
/// [`CancellationHandle`] taken from it) cancels them all.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl RequestContext {
    /// A context with no deadline that is never cancelled unless asked to.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// A handle that can cancel this context from another thread.
    pub fn cancellation_handle(&self) -> CancellationHandle {
        CancellationHandle {
            cancelled: Arc::clone(&self.cancelled),
        }
    }

    /// Fail if the context is cancelled or expired; otherwise return the
    /// remaining budget (`None` when there is no deadline).
    pub fn check(&self) -> Result<Option<Duration>, Error> {
        if self.is_cancelled() {
            return Err(Error::Cancelled);
        }
        match self.deadline {
            None => Ok(None),
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    Err(Error::DeadlineExceeded)
                } else {
                    Ok(Some(remaining))
                }
            }
        }
    }
}

/// Cancels the [`RequestContext`] it was taken from.
#[derive(Debug, Clone)]
pub struct CancellationHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancellationHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}
