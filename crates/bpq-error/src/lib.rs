//! Error types for the bounded priority queue workspace.
//!
//! A dedicated error crate so every member shares one error enum and one
//! `Result` alias. The operational surface is deliberately small: popping an
//! empty queue is the only runtime failure, and it is always recoverable
//! (it means "nothing to do yet", never corruption). Push rejection is *not*
//! an error; it is an expected control-flow signal carried as a `bool` by
//! the queue API.

use thiserror::Error;

/// Primary error type for bounded-priority-queue operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BpqError {
    /// A pop was attempted while no entries were occupied.
    #[error("queue is empty")]
    Empty,

    /// A queue was requested with a capacity that cannot back a fixed array.
    #[error("capacity must be at least 1, got {requested}")]
    InvalidCapacity { requested: usize },
}

impl BpqError {
    /// Whether the caller can recover by retrying later.
    ///
    /// [`Empty`](Self::Empty) clears itself as soon as something is pushed.
    /// [`InvalidCapacity`](Self::InvalidCapacity) is a construction-time
    /// misuse and retrying the same call cannot succeed.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Result type alias using `BpqError`.
pub type Result<T> = std::result::Result<T, BpqError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_empty() {
        assert_eq!(BpqError::Empty.to_string(), "queue is empty");
    }

    #[test]
    fn error_display_invalid_capacity() {
        let err = BpqError::InvalidCapacity { requested: 0 };
        assert_eq!(err.to_string(), "capacity must be at least 1, got 0");
    }

    #[test]
    fn recoverability() {
        assert!(BpqError::Empty.is_recoverable());
        assert!(!BpqError::InvalidCapacity { requested: 0 }.is_recoverable());
    }
}
