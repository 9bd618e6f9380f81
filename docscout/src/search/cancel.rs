use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Caller-held signal that stops a run from dispatching further documents.
///
/// Clones share the same flag. Documents already being read when the signal
/// is raised finish normally and keep their outcomes.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
