//! Thread-safe wrapper around [`RingBuffer`].
//!
//! Appends take a short `parking_lot` lock; readers receive owned snapshots
//! so no lock is held while callers inspect entries.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use super::RingBuffer;

/// Fixed-capacity ring buffer that supports concurrent appends.
///
/// ```rust
/// use std::sync::Arc;
///
/// use intake_common::collections::SharedRingBuffer;
///
/// let log = Arc::new(SharedRingBuffer::new(2));
/// log.push("a");
/// log.push("b");
/// log.push("c");
///
/// assert_eq!(log.snapshot(), vec!["b", "c"]);
/// assert_eq!(log.evicted(), 1);
/// ```
pub struct SharedRingBuffer<T> {
    inner: Mutex<RingBuffer<T>>,
    evicted: AtomicU64,
}

impl<T> SharedRingBuffer<T> {
    /// Create an empty buffer holding at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self { inner: Mutex::new(RingBuffer::new(capacity)), evicted: AtomicU64::new(0) }
    }

    /// Append an entry, evicting the oldest one when full.
    pub fn push(&self, item: T) {
        let evicted = self.inner.lock().push(item);
        if evicted.is_some() {
            self.evicted.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Current number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// `true` when no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Configured capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Total number of entries dropped to make room since creation.
    #[must_use]
    pub fn evicted(&self) -> u64 {
        self.evicted.load(Ordering::Relaxed)
    }

    /// Drop every entry. The eviction counter is left untouched.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl<T: Clone> SharedRingBuffer<T> {
    /// Owned copy of all entries, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.inner.lock().to_vec()
    }

    /// Owned copy of up to `n` newest entries, oldest first.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<T> {
        self.inner.lock().recent(n).into_iter().cloned().collect()
    }
}

impl<T> fmt::Debug for SharedRingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.inner.lock();
        f.debug_struct("SharedRingBuffer")
            .field("len", &guard.len())
            .field("capacity", &guard.capacity())
            .field("evicted", &self.evicted.load(Ordering::Relaxed))
            .finish()
    }
}
