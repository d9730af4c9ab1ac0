//! Bounded min-priority queue.
//!
//! A fixed-capacity container that always retains the most urgent items
//! pushed into it (lower priority value = more urgent) and silently rejects
//! lower-urgency items once full. Built for admission control and top-K
//! retention, where an unbounded queue would be wasteful.
//!
//! Two backing strategies sit behind one contract: a sorted circular buffer
//! ([`SortedRing`]) for small capacities and a binary min-heap with a
//! tracked worst slot ([`BoundedHeap`]) for larger ones. [`Bpq`] picks the
//! backend once at construction based on the requested capacity.
//!
//! The queue is not internally synchronized; callers sharing one across
//! threads must impose their own mutual exclusion.

pub mod entry;
pub mod heap;
pub mod queue;
pub mod ring;
pub mod stats;

pub use bpq_error::{BpqError, Result};

pub use entry::Priority;
pub use heap::BoundedHeap;
pub use queue::{Backend, BoundedQueue, Bpq, RING_CAPACITY_MAX};
pub use ring::SortedRing;
pub use stats::QueueStats;
