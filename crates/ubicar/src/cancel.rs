//! Cancellation and expiry signalling for synthesis calls.
//!
//! The caller may spread one wall-clock budget across many synthesis calls.
//! A [`Cancellation`] handle carries that budget into the search: the
//! builder checks it before starting each new candidate path and the
//! minimizer before each partition round, and both return their best valid
//! result instead of raising an error when the handle reports expiry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Externally supplied cancellation/expiry signal.
///
/// Cheap to clone; clones share the same stop flag.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    deadline: Option<Instant>,
    flag: Option<Arc<AtomicBool>>,
}

impl Cancellation {
    /// A signal that never expires
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Expire at a fixed point in time
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Expire after `budget` from now
    #[must_use]
    pub fn with_timeout(mut self, budget: Duration) -> Self {
        self.deadline = Some(Instant::now() + budget);
        self
    }

    /// Also expire when `flag` is set by another thread
    #[must_use]
    pub fn with_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.flag = Some(flag);
        self
    }

    /// Whether the budget is spent or the stop flag has been raised
    #[must_use]
    pub fn is_expired(&self) -> bool {
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return true;
            }
        }
        self.flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}
