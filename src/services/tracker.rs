//! Request-scoped usage accounting.
//!
//! A fresh [`UsageTracker`] is created for every request and handed to each
//! repository call, which records exactly one call before going out. Nothing
//! is shared between requests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::api::status;

#[derive(Debug)]
pub struct UsageTracker {
    calls: AtomicU64,
    started: Instant,
}

impl UsageTracker {
    /// Start counting from zero, with the clock running from now.
    pub fn start() -> Self {
        Self {
            calls: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    /// Record one outbound remote call.
    pub fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
        status::inc_api_call_count();
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    /// Whole milliseconds since the tracker was started.
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

impl Default for UsageTracker {
    fn default() -> Self {
        Self::start()
    }
}
