//! Sorted circular-buffer backend for small capacities.
//!
//! The ring keeps its occupied span sorted by priority at all times, so pop
//! is a single read at the start cursor and push pays a backward insertion
//! walk bounded by the capacity. In the small-capacity regime this backend
//! is selected for, the walk runs over a cache-resident array and is cheaper
//! in practice than heap bookkeeping.

use std::fmt;

use bpq_error::{BpqError, Result};
use tracing::trace;

use crate::entry::{Entry, Priority};
use crate::queue::BoundedQueue;

/// Fixed-capacity circular buffer whose occupied span is always sorted.
///
/// `start` names the most urgent occupied slot. `end` names the next free
/// slot while the buffer is filling; once the buffer fills, `end` stays
/// pinned on the least urgent occupied slot instead of advancing past
/// `start`. Walked circularly from `start`, the occupied span is in
/// non-decreasing priority order between any two calls.
pub struct SortedRing<T> {
    slots: Vec<Option<Entry<T>>>,
    start: usize,
    end: usize,
}

impl<T> SortedRing<T> {
    /// Create a ring with the given fixed capacity.
    ///
    /// # Errors
    ///
    /// Returns [`BpqError::InvalidCapacity`] when `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(BpqError::InvalidCapacity {
                requested: capacity,
            });
        }
        Ok(Self {
            slots: std::iter::repeat_with(|| None).take(capacity).collect(),
            start: 0,
            end: 0,
        })
    }

    /// Fixed capacity set at construction.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    ///
    /// The occupied span runs from `start` up to `end`, and includes `end`
    /// itself exactly when the cursor is pinned on an occupied slot.
    #[must_use]
    pub fn len(&self) -> usize {
        if self.slots[self.start].is_none() {
            return 0;
        }
        let span = (self.end + self.capacity() - self.start) % self.capacity();
        if self.slots[self.end].is_some() {
            span + 1
        } else {
            span
        }
    }

    /// Returns `true` if no slots are occupied.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots[self.start].is_none()
    }

    /// Returns `true` if every slot is occupied.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    /// Attempt to admit `item` at `priority`.
    ///
    /// The write always lands on the `end` slot: the next free slot while
    /// the buffer is filling, the least urgent resident once it has filled.
    /// An occupied `end` slot rejects the push unless the new entry is at
    /// least as urgent as that resident.
    pub fn push(&mut self, item: T, priority: Priority) -> bool {
        if let Some(resident) = self.priority_at(self.end) {
            if resident < priority {
                trace!(
                    priority = priority.get(),
                    resident = resident.get(),
                    "push rejected, ring retains more urgent entries"
                );
                return false;
            }
        }

        if let Some(evicted) = self.slots[self.end].replace(Entry { item, priority }) {
            trace!(
                priority = priority.get(),
                evicted = evicted.priority.get(),
                "evicted least urgent ring entry"
            );
        }

        let written = self.end;
        let next = self.wrap_next(self.end);
        if next != self.start {
            self.end = next;
        }

        // Walk the new entry backward toward start until its predecessor is
        // at least as urgent.
        let mut index = written;
        while index != self.start {
            let prev = self.wrap_prev(index);
            match self.priority_at(prev) {
                Some(prev_priority) if prev_priority > priority => {
                    self.slots.swap(index, prev);
                    index = prev;
                }
                _ => break,
            }
        }

        true
    }

    /// Remove and return the most urgent entry.
    ///
    /// # Errors
    ///
    /// Returns [`BpqError::Empty`] when no slots are occupied.
    pub fn pop(&mut self) -> Result<T> {
        let Some(entry) = self.slots[self.start].take() else {
            return Err(BpqError::Empty);
        };
        self.start = self.wrap_next(self.start);
        if self.slots[self.start].is_none() {
            // Drained: re-arm both cursors on the same empty slot so the
            // next push lands where pop will find it.
            self.end = self.start;
        }
        Ok(entry.item)
    }

    /// Borrow the entry `pop` would return next, without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<(&T, Priority)> {
        self.slots[self.start]
            .as_ref()
            .map(|entry| (&entry.item, entry.priority))
    }

    #[inline]
    fn wrap_next(&self, index: usize) -> usize {
        (index + 1) % self.slots.len()
    }

    #[inline]
    fn wrap_prev(&self, index: usize) -> usize {
        if index == 0 {
            self.slots.len() - 1
        } else {
            index - 1
        }
    }

    #[inline]
    fn priority_at(&self, index: usize) -> Option<Priority> {
        self.slots[index].as_ref().map(|entry| entry.priority)
    }
}

impl<T> BoundedQueue<T> for SortedRing<T> {
    fn capacity(&self) -> usize {
        SortedRing::capacity(self)
    }

    fn len(&self) -> usize {
        SortedRing::len(self)
    }

    fn push(&mut self, item: T, priority: Priority) -> bool {
        SortedRing::push(self, item, priority)
    }

    fn pop(&mut self) -> Result<T> {
        SortedRing::pop(self)
    }

    fn peek(&self) -> Option<(&T, Priority)> {
        SortedRing::peek(self)
    }
}

impl<T> fmt::Debug for SortedRing<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortedRing")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .field("start", &self.start)
            .field("end", &self.end)
            .finish()
    }
}
