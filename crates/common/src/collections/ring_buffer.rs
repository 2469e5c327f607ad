#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

//! A fixed-capacity circular buffer that evicts its oldest entry when full.
//!
//! [`RingBuffer`] keeps items in insertion order with a hard upper bound on
//! length. [`push`](RingBuffer::push) hands back whatever it evicted, so a
//! caller that cares about dropped diagnostics can count them.
//!
//! # Complexity
//! - `push`, `pop_oldest`, `get`, `len`, `is_empty`, `is_full` and
//!   `capacity` are **O(1)**; `recent(n)` is **O(n)**.
//!
//! # Thread Safety
//! - `RingBuffer<T>` has no interior mutability. Wrap it in
//!   [`SharedRingBuffer`](super::SharedRingBuffer) for concurrent appends.

use std::collections::VecDeque;

/// A fixed-capacity FIFO buffer that overwrites its oldest element.
///
/// # Examples
///
/// ```rust
/// use intake_common::collections::RingBuffer;
///
/// let mut buffer = RingBuffer::new(3);
/// buffer.push(1);
/// buffer.push(2);
/// buffer.push(3);
/// assert_eq!(buffer.push(4), Some(1));
///
/// assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
/// assert_eq!(buffer.recent(2), vec![&3, &4]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RingBuffer<T> {
    buf: VecDeque<T>,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// Creates a new buffer with the provided capacity.
    ///
    /// A capacity of zero is clamped to `1`.
    #[inline]
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { buf: VecDeque::with_capacity(capacity), capacity }
    }

    /// Appends an item, returning the evicted oldest item when the buffer
    /// was already full.
    #[inline]
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.is_full() { self.buf.pop_front() } else { None };
        self.buf.push_back(item);
        evicted
    }

    /// Removes and returns the oldest item.
    #[inline]
    pub fn pop_oldest(&mut self) -> Option<T> {
        self.buf.pop_front()
    }

    /// Returns the item at `idx`, counting from the oldest element.
    #[inline]
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&T> {
        self.buf.get(idx)
    }

    /// Returns the newest item.
    #[inline]
    #[must_use]
    pub fn latest(&self) -> Option<&T> {
        self.buf.back()
    }

    /// Returns up to `n` of the newest items, oldest first.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<&T> {
        let skip = self.buf.len().saturating_sub(n);
        self.buf.iter().skip(skip).collect()
    }

    /// Number of items currently stored.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// `true` when nothing is stored.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// `true` once the next push will evict.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    /// Maximum number of items the buffer holds.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Removes all elements, leaving the capacity unchanged.
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Iterates from oldest to newest.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buf.iter()
    }
}

impl<T: Clone> RingBuffer<T> {
    /// Copies the contents out, oldest first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.buf.iter().cloned().collect()
    }
}

impl<T> Default for RingBuffer<T> {
    #[inline]
    fn default() -> Self {
        Self::new(1)
    }
}

impl<T> IntoIterator for RingBuffer<T> {
    type Item = T;
    type IntoIter = std::collections::vec_deque::IntoIter<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.buf.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a RingBuffer<T> {
    type Item = &'a T;
    type IntoIter = std::collections::vec_deque::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.buf.iter()
    }
}
