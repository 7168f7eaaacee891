// src/rpc/ids.rs
// Correlation id source for outgoing JSON-RPC requests

use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out unique, auto-incrementing ids so responses can be matched to
/// their requests. One instance per process, shared via `Arc`.
#[derive(Debug, Default)]
pub struct RequestIds {
    counter: AtomicU64,
}

impl RequestIds {
    /// Largest id a JSON consumer can represent without precision loss
    /// (2^53 - 1). Past this the counter wraps back to 1, never 0.
    pub const MAX_ID: u64 = (1 << 53) - 1;

    pub fn new() -> Self {
        Self::default()
    }

    /// Next available id. Serialized increments, safe from concurrent callers.
    pub fn next(&self) -> u64 {
        let prev = self
            .counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| {
                Some(if v >= Self::MAX_ID { 1 } else { v + 1 })
            })
            .unwrap_or_else(|v| v); // closure always returns Some
        if prev >= Self::MAX_ID { 1 } else { prev + 1 }
    }

    /// Reset the counter. Test harness use only.
    pub fn reset(&self) {
        self.counter.store(0, Ordering::SeqCst);
    }
}
