//! The three-way outcome contract for storage collaborators.
//!
//! Every storage primitive reports one of three outcomes: a value was
//! found, nothing matched, or the store itself failed. The distinction
//! between "nothing matched" and "failed" is load-bearing — the resource
//! manager maps the former to 404 and the latter to 400 — so the contract
//! is a tagged enum rather than sentinel values.

use thiserror::Error;

/// A hard failure reported by a storage collaborator.
///
/// Carries only a human-readable detail; retries and alerting for real
/// infrastructure failures are the collaborator's responsibility before an
/// outcome ever reaches this layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StoreError {
    message: String,
}

impl StoreError {
    /// Creates a store error with the given detail.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failure detail.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Outcome of a storage primitive.
///
/// # Example
///
/// ```rust
/// use restkit::{StoreError, StoreOutcome};
///
/// let found: StoreOutcome<i32> = StoreOutcome::Found(5);
/// assert_eq!(found.into_found(), Some(5));
///
/// let missing: StoreOutcome<i32> = StoreOutcome::Missing;
/// assert!(missing.is_missing());
///
/// let failed: StoreOutcome<i32> = StoreOutcome::Failed(StoreError::new("connection reset"));
/// assert!(failed.is_failed());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOutcome<T> {
    /// The operation succeeded with a value.
    Found(T),
    /// The operation succeeded but nothing matched. Never conflated with
    /// [`StoreOutcome::Failed`].
    Missing,
    /// The store reported a hard error.
    Failed(StoreError),
}

impl<T> StoreOutcome<T> {
    /// Returns `true` for [`StoreOutcome::Found`].
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Returns `true` for [`StoreOutcome::Missing`].
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Returns `true` for [`StoreOutcome::Failed`].
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Consumes the outcome, yielding the found value if there is one.
    #[must_use]
    pub fn into_found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            _ => None,
        }
    }
}

// Verify StoreOutcome is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StoreOutcome<serde_json::Value>>();
    assert_send_sync::<StoreError>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_predicates() {
        let found: StoreOutcome<u8> = StoreOutcome::Found(1);
        assert!(found.is_found());
        assert!(!found.is_missing());
        assert!(!found.is_failed());

        let missing: StoreOutcome<u8> = StoreOutcome::Missing;
        assert!(missing.is_missing());

        let failed: StoreOutcome<u8> = StoreOutcome::Failed(StoreError::new("down"));
        assert!(failed.is_failed());
    }

    #[test]
    fn test_into_found_yields_value_only_for_found() {
        assert_eq!(StoreOutcome::Found(7).into_found(), Some(7));
        assert_eq!(StoreOutcome::<u8>::Missing.into_found(), None);
        assert_eq!(
            StoreOutcome::<u8>::Failed(StoreError::new("down")).into_found(),
            None
        );
    }

    #[test]
    fn test_store_error_displays_its_message() {
        let error = StoreError::new("connection reset");
        assert_eq!(error.to_string(), "connection reset");
        assert_eq!(error.message(), "connection reset");
    }
}
