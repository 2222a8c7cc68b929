//! Monotonic id sequences scoped to one exchange instance.

use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe monotonic counter.
///
/// Every call to [`next_id`](Self::next_id) returns a value strictly greater
/// than any value previously returned by the same generator.
#[derive(Debug)]
pub struct SequenceGenerator {
    next: AtomicU64,
}

impl SequenceGenerator {
    pub fn new(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Take the next id
    #[inline]
    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for SequenceGenerator {
    fn default() -> Self {
        Self::new(1)
    }
}
