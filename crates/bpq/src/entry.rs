//! Priority and entry types shared by both queue backends.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer urgency value; smaller values are more urgent and pop first.
///
/// The queue compares nothing else: payloads are opaque and only the
/// priority supplied alongside them drives ordering, admission, and
/// eviction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct Priority(i64);

impl Priority {
    /// The most urgent representable priority.
    pub const MIN: Self = Self(i64::MIN);

    /// The least urgent representable priority.
    pub const MAX: Self = Self(i64::MAX);

    /// Create a priority from a raw urgency value.
    #[inline]
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw urgency value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Priority {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// A slot-owned entry: the opaque payload plus the priority that orders it.
///
/// Occupancy is the enclosing `Option` in the backing array; an entry exists
/// exactly while its slot is occupied and is dropped when popped or evicted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry<T> {
    pub item: T,
    pub priority: Priority,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smaller_value_is_more_urgent() {
        assert!(Priority::new(-3) < Priority::new(0));
        assert!(Priority::MIN < Priority::MAX);
    }

    #[test]
    fn display_shows_raw_value() {
        assert_eq!(Priority::new(-42).to_string(), "-42");
    }

    #[test]
    fn from_raw_round_trips() {
        let priority = Priority::from(7);
        assert_eq!(priority.get(), 7);
        assert_eq!(priority, Priority::new(7));
    }
}
