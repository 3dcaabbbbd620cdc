//! Injectable clock for TTL decisions.

use std::time::Instant;

/// Source of monotonic time for cache staleness checks.
///
/// Injected so tests can drive the TTL window deterministically.
pub trait Clock: Send + Sync + 'static {
    /// The current instant.
    fn now(&self) -> Instant;
}

/// The production clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
