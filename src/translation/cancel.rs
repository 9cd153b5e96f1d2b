/*!
 * Cooperative cancellation shared between a running job and whoever may
 * cancel it (CLI signal handler, UI button, test harness).
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cancellation flag polled at work-unit boundaries and around provider calls.
///
/// Clones share the same flag. Setting it never interrupts a request that is
/// already in flight; the job stops at its next poll point.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Clear the flag before a new job starts
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }
}
