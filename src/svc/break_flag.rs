use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared `broken` flag of a chain.
///
/// Clones observe the same state, so a clone can be moved into a completion callback to break
/// the chain from the UI context.
#[derive(Debug, Clone, Default)]
pub struct BreakFlag(Arc<AtomicBool>);

impl BreakFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_broken(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Clearing the flag only matters if no request has been dequeued since it was set.
    pub fn set(&self, broken: bool) {
        self.0.store(broken, Ordering::Release);
    }

    pub fn break_chain(&self) {
        self.set(true);
    }
}
