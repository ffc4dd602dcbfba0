//! Shared primitive types and clock helpers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Version number of a published tree. Starts at 1 for the initial snapshot.
pub type Version = u64;

/// Numeric product reference used by the storefront catalog and the router.
///
/// Signed so any integer in an address resolves; catalog ids are never negative.
pub type ProductNumber = i64;

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

static LEGACY_CLOCK: LegacyClock = LegacyClock::new();

/// Millisecond clock for legacy numeric identifiers.
///
/// Readings are strictly increasing within a process: two readings in the same
/// millisecond tick yield `t` and `t + 1`.
pub struct LegacyClock {
    last: AtomicU64,
}

impl LegacyClock {
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Process-wide clock instance.
    pub fn global() -> &'static LegacyClock {
        &LEGACY_CLOCK
    }

    /// Next reading, never equal to or below a previous one.
    pub fn next(&self) -> u64 {
        self.next_from(now_millis())
    }

    fn next_from(&self, now: u64) -> u64 {
        let mut current = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(current + 1);
            match self.last.compare_exchange_weak(
                current,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(observed) => current = observed,
            }
        }
    }
}

impl Default for LegacyClock {
    fn default() -> Self {
        Self::new()
    }
}
