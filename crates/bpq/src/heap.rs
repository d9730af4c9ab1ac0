//! Binary min-heap backend with a tracked worst slot, for larger capacities.
//!
//! The heap gives O(log n) push and pop. The extra `worst` index names the
//! least urgent occupied slot so a full queue can reject a push with a
//! single comparison; the price is an O(n) rescan after every *successful*
//! full-queue push, because replacing the former maximum can hand the title
//! to any slot. Under sustained overload rejections dominate, so the common
//! case stays cheap.

use std::fmt;

use bpq_error::{BpqError, Result};
use tracing::trace;

use crate::entry::{Entry, Priority};
use crate::queue::BoundedQueue;

/// Array-backed bounded min-heap.
///
/// Slots `[0, len)` are occupied and satisfy the min-heap property: a slot's
/// priority never exceeds its children's (children of `i` at `2i + 1` and
/// `2i + 2`, parent at `(i - 1) / 2`). `worst` equals the index of the
/// maximum-priority occupied slot whenever the heap is full; while filling
/// it is only advisory.
pub struct BoundedHeap<T> {
    slots: Vec<Option<Entry<T>>>,
    len: usize,
    worst: usize,
}

impl<T> BoundedHeap<T> {
    /// Create a heap with the given fixed capacity.
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
            len: 0,
            worst: 0,
        })
    }

    /// Fixed capacity set at construction.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no slots are occupied.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if every slot is occupied.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Attempt to admit `item` at `priority`.
    ///
    /// Below capacity the push always succeeds. At capacity it succeeds only
    /// when strictly more urgent than the worst resident, which it then
    /// replaces.
    pub fn push(&mut self, item: T, priority: Priority) -> bool {
        if self.len == self.capacity() {
            return self.push_full(item, priority);
        }

        let slot = self.len;
        self.slots[slot] = Some(Entry { item, priority });
        self.len += 1;

        if self.priority_at(self.worst).is_none_or(|worst| priority > worst) {
            // Strictly worse than the tracked worst: a larger leaf never
            // violates min-heap order upward, so no sift is needed.
            self.worst = slot;
        } else {
            self.sift_up(slot);
        }

        if self.len == self.capacity() {
            // The filling-phase worst is only advisory; make it exact the
            // moment admission control starts depending on it.
            self.worst = self.rescan_worst();
        }

        true
    }

    fn push_full(&mut self, item: T, priority: Priority) -> bool {
        let Some(worst_priority) = self.priority_at(self.worst) else {
            // A full heap has every slot occupied, worst included.
            return false;
        };
        if priority >= worst_priority {
            trace!(
                priority = priority.get(),
                worst = worst_priority.get(),
                "push rejected, heap retains entries at least as urgent"
            );
            return false;
        }

        if let Some(evicted) = self.slots[self.worst].replace(Entry { item, priority }) {
            trace!(
                priority = priority.get(),
                evicted = evicted.priority.get(),
                "evicted least urgent heap entry"
            );
        }
        self.sift_up(self.worst);
        // Replacing the former maximum can hand the title to any slot; only
        // a full scan over the occupied slots can tell which.
        self.worst = self.rescan_worst();
        true
    }

    /// Remove and return the most urgent entry.
    ///
    /// # Errors
    ///
    /// Returns [`BpqError::Empty`] when no slots are occupied.
    pub fn pop(&mut self) -> Result<T> {
        let Some(root) = self.slots[0].take() else {
            return Err(BpqError::Empty);
        };
        let last = self.len - 1;
        let popping_worst = last == self.worst;
        let moved = self.slots[last].take();
        self.len = last;

        if let Some(moved) = moved {
            self.slots[0] = Some(moved);
            let landed = self.sift_down(0);
            if popping_worst {
                // The tracked worst entry is the one we just relocated;
                // follow it to wherever the sift put it.
                self.worst = landed;
            }
        }

        Ok(root.item)
    }

    /// Borrow the entry `pop` would return next, without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<(&T, Priority)> {
        self.slots[0]
            .as_ref()
            .map(|entry| (&entry.item, entry.priority))
    }

    /// Walk the entry at `index` toward the root while its parent is
    /// strictly less urgent.
    fn sift_up(&mut self, mut index: usize) {
        let Some(moving) = self.priority_at(index) else {
            return;
        };
        while index > 0 {
            let parent = (index - 1) / 2;
            match self.priority_at(parent) {
                Some(above) if above > moving => {
                    self.slots.swap(index, parent);
                    index = parent;
                }
                _ => break,
            }
        }
    }

    /// Walk the entry at `index` toward the leaves, swapping with the more
    /// urgent child while that child is strictly more urgent than the entry.
    /// Returns the entry's final resting index.
    fn sift_down(&mut self, mut index: usize) -> usize {
        let Some(moving) = self.priority_at(index) else {
            return index;
        };
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut candidate = index;
            let mut best = moving;
            if left < self.len {
                if let Some(child) = self.priority_at(left) {
                    if child < best {
                        candidate = left;
                        best = child;
                    }
                }
            }
            if right < self.len {
                if let Some(child) = self.priority_at(right) {
                    if child < best {
                        candidate = right;
                        best = child;
                    }
                }
            }
            if candidate == index {
                return index;
            }
            self.slots.swap(index, candidate);
            index = candidate;
        }
    }

    /// Index of the maximum-priority occupied slot; ties go to the highest
    /// index.
    fn rescan_worst(&self) -> usize {
        let mut worst_index = 0;
        let mut worst_priority = Priority::MIN;
        for index in 0..self.len {
            if let Some(priority) = self.priority_at(index) {
                if priority >= worst_priority {
                    worst_index = index;
                    worst_priority = priority;
                }
            }
        }
        worst_index
    }

    #[inline]
    fn priority_at(&self, index: usize) -> Option<Priority> {
        self.slots[index].as_ref().map(|entry| entry.priority)
    }
}

impl<T> BoundedQueue<T> for BoundedHeap<T> {
    fn capacity(&self) -> usize {
        BoundedHeap::capacity(self)
    }

    fn len(&self) -> usize {
        BoundedHeap::len(self)
    }

    fn push(&mut self, item: T, priority: Priority) -> bool {
        BoundedHeap::push(self, item, priority)
    }

    fn pop(&mut self) -> Result<T> {
        BoundedHeap::pop(self)
    }

    fn peek(&self) -> Option<(&T, Priority)> {
        BoundedHeap::peek(self)
    }
}

impl<T> fmt::Debug for BoundedHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedHeap")
            .field("capacity", &self.capacity())
            .field("len", &self.len)
            .field("worst", &self.worst)
            .finish()
    }
}
