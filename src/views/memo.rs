//! Identity-keyed memo cells.
//!
//! A cell remembers the collections it was computed from. A lookup with the same
//! collections (same storage, not merely equal content) returns the cached value.
//! The cell holds clones of its inputs, so their storage stays alive and cannot be
//! reused by a different collection while cached.

use crate::store::Collection;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Hit and miss counters of a memo cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoStats {
    pub hits: u64,
    pub misses: u64,
}

impl std::ops::Add for MemoStats {
    type Output = MemoStats;

    fn add(self, rhs: MemoStats) -> MemoStats {
        MemoStats {
            hits: self.hits + rhs.hits,
            misses: self.misses + rhs.misses,
        }
    }
}

struct Cached<V> {
    inputs: Vec<Collection>,
    value: Arc<V>,
}

pub struct Memo<V> {
    slot: Mutex<Option<Cached<V>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V> Default for Memo<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Memo<V> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Cached value for `inputs`, computing it with `compute` on a miss.
    pub fn get_or_compute(&self, inputs: &[&Collection], compute: impl FnOnce() -> V) -> Arc<V> {
        let mut slot = self.slot.lock();
        if let Some(cached) = slot.as_ref() {
            if same_inputs(&cached.inputs, inputs) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Arc::clone(&cached.value);
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let value = Arc::new(compute());
        *slot = Some(Cached {
            inputs: inputs.iter().map(|c| (*c).clone()).collect(),
            value: Arc::clone(&value),
        });
        value
    }

    pub fn stats(&self) -> MemoStats {
        MemoStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    pub fn invalidate(&self) {
        *self.slot.lock() = None;
    }
}

fn same_inputs(cached: &[Collection], inputs: &[&Collection]) -> bool {
    cached.len() == inputs.len()
        && cached
            .iter()
            .zip(inputs.iter())
            .all(|(a, b)| a.same_identity(b))
}
