use std::time::Duration;

use thiserror::Error;

/// Boxed error returned by a fallible value builder.
pub type BuildError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures surfaced by the claim protocol and guard construction.
///
/// Every construction and initialization path returns this same error type,
/// so callers can either propagate with `?` or inspect the variant and retry.
/// A returned error always means nothing observable changed: no registry
/// entry was left behind and no value is owned by the guard.
#[derive(Debug, Error)]
pub enum ClaimError {
    /// The condition key was already claimed in the registry.
    #[error("condition is already claimed")]
    DuplicateCondition,

    /// The registry lock could not be acquired within the caller's deadline.
    #[error("timed out after {0:?} waiting for the claim registry lock")]
    LockTimeout(Duration),

    /// The value builder failed after the claim succeeded.
    ///
    /// The claim has already been rolled back when this variant is returned.
    #[error("value construction failed: {0}")]
    ConstructionFailed(#[source] BuildError),
}

impl ClaimError {
    /// True for the duplicate-condition failure.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, ClaimError::DuplicateCondition)
    }

    /// True for the lock-timeout failure.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClaimError::LockTimeout(_))
    }
}
