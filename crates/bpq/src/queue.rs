//! The shared queue contract and the capacity-based backend selector.

use std::fmt;

use bpq_error::Result;
use serde::Serialize;
use tracing::debug;

use crate::entry::Priority;
use crate::heap::BoundedHeap;
use crate::ring::SortedRing;
use crate::stats::QueueStats;

/// Largest capacity served by the sorted-ring backend.
///
/// At and below this size the ring's insertion walk runs over a small,
/// cache-resident array and beats heap bookkeeping; above it the heap's
/// logarithmic operations win. Fixed tuning constant, not user-configurable.
pub const RING_CAPACITY_MAX: usize = 128;

/// Operation set both backends honor.
///
/// Push rejection is control flow, not an error: `false` means the queue is
/// full and every resident is at least as urgent, so admission would not
/// improve the retained set. `pop` is the only operation that can fail, and
/// only with [`BpqError::Empty`](bpq_error::BpqError::Empty).
pub trait BoundedQueue<T> {
    /// Fixed capacity set at construction.
    fn capacity(&self) -> usize;

    /// Number of occupied entries.
    fn len(&self) -> usize;

    /// Returns `true` if no entries are occupied.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if every slot is occupied.
    fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    /// Attempt to admit `item` at `priority`; returns whether it was
    /// admitted.
    #[must_use]
    fn push(&mut self, item: T, priority: Priority) -> bool;

    /// Remove and return the most urgent entry.
    ///
    /// # Errors
    ///
    /// Returns [`BpqError::Empty`](bpq_error::BpqError::Empty) when no entries are occupied.
    fn pop(&mut self) -> Result<T>;

    /// Borrow the entry `pop` would return next, without removing it.
    fn peek(&self) -> Option<(&T, Priority)>;
}

/// Backend discriminant reported by [`Bpq::backend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Backend {
    /// Sorted circular buffer, for capacities up to [`RING_CAPACITY_MAX`].
    SortedRing,
    /// Binary min-heap with tracked worst slot, above the threshold.
    BoundedHeap,
}

enum BackendImpl<T> {
    Ring(SortedRing<T>),
    Heap(BoundedHeap<T>),
}

/// Bounded min-priority queue with a capacity-selected backing strategy.
///
/// Construction picks the backend once and the choice is fixed for the
/// value's lifetime; every later operation goes straight to the chosen
/// strategy. Operations mutate the fixed backing array only; nothing is
/// allocated after construction. The queue is not internally synchronized,
/// so concurrent callers must impose their own mutual exclusion.
pub struct Bpq<T> {
    inner: BackendImpl<T>,
    stats: QueueStats,
}

impl<T> Bpq<T> {
    /// Create a queue with the given fixed capacity, selecting the backend.
    ///
    /// # Errors
    ///
    /// Returns [`BpqError::InvalidCapacity`](bpq_error::BpqError::InvalidCapacity) when `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let inner = if capacity <= RING_CAPACITY_MAX {
            BackendImpl::Ring(SortedRing::with_capacity(capacity)?)
        } else {
            BackendImpl::Heap(BoundedHeap::with_capacity(capacity)?)
        };
        let queue = Self {
            inner,
            stats: QueueStats::default(),
        };
        debug!(
            capacity,
            backend = ?queue.backend(),
            "created bounded priority queue"
        );
        Ok(queue)
    }

    /// Which backend the capacity selected.
    #[inline]
    #[must_use]
    pub fn backend(&self) -> Backend {
        match &self.inner {
            BackendImpl::Ring(_) => Backend::SortedRing,
            BackendImpl::Heap(_) => Backend::BoundedHeap,
        }
    }

    /// Admission and removal counters accumulated since construction.
    #[inline]
    #[must_use]
    pub fn stats(&self) -> QueueStats {
        self.stats
    }

    /// Fixed capacity set at construction.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        match &self.inner {
            BackendImpl::Ring(ring) => ring.capacity(),
            BackendImpl::Heap(heap) => heap.capacity(),
        }
    }

    /// Number of occupied entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.inner {
            BackendImpl::Ring(ring) => ring.len(),
            BackendImpl::Heap(heap) => heap.len(),
        }
    }

    /// Returns `true` if no entries are occupied.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if every slot is occupied.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    /// Attempt to admit `item` at `priority`; returns whether it was
    /// admitted.
    #[must_use]
    pub fn push(&mut self, item: T, priority: Priority) -> bool {
        let was_full = self.is_full();
        let admitted = match &mut self.inner {
            BackendImpl::Ring(ring) => ring.push(item, priority),
            BackendImpl::Heap(heap) => heap.push(item, priority),
        };
        self.stats.record_push(admitted, was_full);
        admitted
    }

    /// Remove and return the most urgent entry.
    ///
    /// # Errors
    ///
    /// Returns [`BpqError::Empty`](bpq_error::BpqError::Empty) when no entries are occupied.
    pub fn pop(&mut self) -> Result<T> {
        let result = match &mut self.inner {
            BackendImpl::Ring(ring) => ring.pop(),
            BackendImpl::Heap(heap) => heap.pop(),
        };
        self.stats.record_pop(result.is_ok());
        result
    }

    /// Borrow the entry `pop` would return next, without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<(&T, Priority)> {
        match &self.inner {
            BackendImpl::Ring(ring) => ring.peek(),
            BackendImpl::Heap(heap) => heap.peek(),
        }
    }
}

impl<T> BoundedQueue<T> for Bpq<T> {
    fn capacity(&self) -> usize {
        Bpq::capacity(self)
    }

    fn len(&self) -> usize {
        Bpq::len(self)
    }

    fn push(&mut self, item: T, priority: Priority) -> bool {
        Bpq::push(self, item, priority)
    }

    fn pop(&mut self) -> Result<T> {
        Bpq::pop(self)
    }

    fn peek(&self) -> Option<(&T, Priority)> {
        Bpq::peek(self)
    }
}

impl<T> fmt::Debug for Bpq<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bpq")
            .field("backend", &self.backend())
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use bpq_error::BpqError;

    fn p(value: i64) -> Priority {
        Priority::new(value)
    }

    #[test]
    fn selector_flips_backend_at_the_threshold() {
        let ring = Bpq::<u32>::with_capacity(RING_CAPACITY_MAX).expect("construct");
        assert_eq!(ring.backend(), Backend::SortedRing);
        assert_eq!(ring.capacity(), RING_CAPACITY_MAX);

        let heap = Bpq::<u32>::with_capacity(RING_CAPACITY_MAX + 1).expect("construct");
        assert_eq!(heap.backend(), Backend::BoundedHeap);
        assert_eq!(heap.capacity(), RING_CAPACITY_MAX + 1);
    }

    #[test]
    fn zero_capacity_is_rejected_at_construction() {
        let err = Bpq::<u32>::with_capacity(0).unwrap_err();
        assert_eq!(err, BpqError::InvalidCapacity { requested: 0 });
    }

    #[test]
    fn operations_dispatch_to_the_selected_backend() {
        for capacity in [4_usize, RING_CAPACITY_MAX + 4] {
            let mut queue = Bpq::with_capacity(capacity).expect("construct");
            assert!(queue.is_empty());
            assert!(queue.push(1, p(10)));
            assert!(queue.push(2, p(5)));
            assert_eq!(queue.len(), 2);
            assert_eq!(queue.peek(), Some((&2, p(5))));
            assert_eq!(queue.pop(), Ok(2));
            assert_eq!(queue.pop(), Ok(1));
            assert_eq!(queue.pop(), Err(BpqError::Empty));
        }
    }

    #[test]
    fn stats_reconcile_with_operations() {
        let mut queue = Bpq::with_capacity(2).expect("construct");
        assert!(queue.push(1, p(10)));
        assert!(queue.push(2, p(20)));
        assert!(!queue.push(3, p(30)));
        assert!(queue.push(4, p(5)));
        assert_eq!(queue.pop(), Ok(4));
        assert_eq!(queue.pop(), Ok(1));
        assert_eq!(queue.pop(), Err(BpqError::Empty));

        let stats = queue.stats();
        assert_eq!(stats.admitted, 3);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.evicted, 1);
        assert_eq!(stats.popped, 2);
        assert_eq!(stats.empty_pops, 1);
    }
}
