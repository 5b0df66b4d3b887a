//! Cooperative cancellation for driver loops
//!
//! Drivers poll the token once per iteration; a single gate or measurement
//! is never interrupted.

use qlab_core::{QlabError, QlabResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; visible to every clone
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// `Err(Cancelled)` once cancellation was requested
    pub fn check(&self, iterations: usize) -> QlabResult<()> {
        if self.is_cancelled() {
            return Err(QlabError::Cancelled { iterations });
        }
        Ok(())
    }
}
